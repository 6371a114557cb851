mod store;

use std::{path::PathBuf, process::ExitCode};

use ark_bls12_381::{Bls12_381, Fr};
use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use qap_snark::{
    CircuitDescription, CompiledCircuit, Groth16, Pinocchio, PreparedCircuit, Protocol, QapSnark,
};
use store::{Inputs, Store, Tagged};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory holding the circuit, its inputs and every generated file
    #[arg(long, global = true, default_value = ".")]
    path: PathBuf,

    /// Proving system used by `trustedsetup`, `genproofs` and `verify`
    #[arg(long, global = true, default_value_t = Protocol::Original)]
    protocol: Protocol,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Copy)]
enum Command {
    /// Compile circuit.json to an R1CS and check it against the inputs
    Compile,

    /// Run the trusted setup for the compiled circuit
    #[command(name = "trustedsetup")]
    TrustedSetup,

    /// Prove that the inputs satisfy the compiled circuit
    #[command(name = "genproofs")]
    GenProofs,

    /// Verify proof.json against the public inputs
    Verify,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let store = Store::new(&cli.path);

    match cli.protocol {
        Protocol::Original => run::<Pinocchio<Bls12_381>>(&store, cli.command),
        Protocol::Groth16 => run::<Groth16<Bls12_381>>(&store, cli.command),
    }
}

fn run<S: QapSnark<Bls12_381>>(store: &Store, command: Command) -> Result<ExitCode> {
    match command {
        Command::Compile => compile(store)?,
        Command::TrustedSetup => trusted_setup::<S>(store)?,
        Command::GenProofs => generate_proof::<S>(store)?,
        Command::Verify => {
            if verify::<S>(store)? {
                println!("verified");
            } else {
                println!("not verified");
                return Ok(ExitCode::FAILURE);
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_inputs(store: &Store, name: &str) -> Result<Vec<Fr>> {
    let Inputs(values) = store.read(name)?;
    Ok(values)
}

fn load_circuit(store: &Store) -> Result<CompiledCircuit<Fr>> {
    Ok(store.read(store::COMPILED_CIRCUIT)?)
}

fn compile(store: &Store) -> Result<()> {
    let description: CircuitDescription = store.read(store::CIRCUIT)?;
    let compiled = description.compile::<Fr>()?;

    let private_inputs = read_inputs(store, store::PRIVATE_INPUTS)?;
    let public_inputs = read_inputs(store, store::PUBLIC_INPUTS)?;
    let witness = compiled.evaluate_witness(&private_inputs, &public_inputs)?;

    let prepared = PreparedCircuit::new(compiled.r1cs.clone())?;
    let combined = prepared.combine(&witness)?;
    info!(
        constraints = compiled.r1cs.num_constraints(),
        wires = compiled.r1cs.num_wires(),
        quotient_degree = combined.h.degree(),
        "circuit compiled"
    );

    let path = store.write(store::COMPILED_CIRCUIT, &compiled)?;
    println!("Compiled circuit written to {}", path.display());
    Ok(())
}

fn trusted_setup<S: QapSnark<Bls12_381>>(store: &Store) -> Result<()> {
    let circuit = PreparedCircuit::new(load_circuit(store)?.r1cs)?;
    let (proving_key, verifying_key) = circuit.setup::<Bls12_381, S, _>(&mut rand::thread_rng())?;

    let pk_path = store.write(store::TRUSTED_SETUP, &Tagged::new(S::PROTOCOL, proving_key))?;
    let vk_path = store.write(store::VERIFYING_KEY, &Tagged::new(S::PROTOCOL, verifying_key))?;
    println!(
        "Trusted setup ({}) written to {} and {}",
        S::PROTOCOL,
        pk_path.display(),
        vk_path.display()
    );
    Ok(())
}

fn generate_proof<S: QapSnark<Bls12_381>>(store: &Store) -> Result<()> {
    let compiled = load_circuit(store)?;
    let proving_key: S::ProvingKey = store.read_tagged(store::TRUSTED_SETUP, S::PROTOCOL)?;

    let private_inputs = read_inputs(store, store::PRIVATE_INPUTS)?;
    let public_inputs = read_inputs(store, store::PUBLIC_INPUTS)?;
    let witness = compiled.evaluate_witness(&private_inputs, &public_inputs)?;

    let circuit = PreparedCircuit::new(compiled.r1cs)?;
    let proof = circuit
        .prove::<Bls12_381, S, _>(&proving_key, &witness, &mut rand::thread_rng())
        .wrap_err("proof generation failed")?;

    let path = store.write(store::PROOF, &Tagged::new(S::PROTOCOL, proof))?;
    println!("Proof ({}) written to {}", S::PROTOCOL, path.display());
    Ok(())
}

/// Only the verifying key is loaded; the proving key is never needed here.
fn verify<S: QapSnark<Bls12_381>>(store: &Store) -> Result<bool> {
    let verifying_key: S::VerifyingKey = store.read_tagged(store::VERIFYING_KEY, S::PROTOCOL)?;
    let proof: S::Proof = store.read_tagged(store::PROOF, S::PROTOCOL)?;
    let public_inputs = read_inputs(store, store::PUBLIC_INPUTS)?;

    Ok(S::verify_proof(&verifying_key, &proof, &public_inputs)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qap_snark::Error;
    use std::fs;

    const MULTIPLY: &str = r#"{
        "public": ["c"],
        "private": ["a", "b"],
        "constraints": [ { "a": { "a": "1" }, "b": { "b": "1" }, "c": { "c": "1" } } ]
    }"#;

    fn workspace(name: &str, public_inputs: &str) -> Store {
        let store = store::scratch(name);
        fs::write(store.path(store::CIRCUIT), MULTIPLY).unwrap();
        fs::write(store.path(store::PRIVATE_INPUTS), "[2, 3]").unwrap();
        fs::write(store.path(store::PUBLIC_INPUTS), public_inputs).unwrap();
        store
    }

    #[test]
    fn compile_reports_unsatisfied_inputs_as_invalid_witness() {
        let store = workspace("cli-forged", "[7]");
        let err = compile(&store).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidWitness { .. })
        ));
        assert!(!store.path(store::COMPILED_CIRCUIT).exists());
    }

    fn full_pipeline<S: QapSnark<Bls12_381>>(name: &str) {
        let store = workspace(name, "[6]");
        compile(&store).unwrap();
        trusted_setup::<S>(&store).unwrap();
        generate_proof::<S>(&store).unwrap();

        fs::remove_file(store.path(store::TRUSTED_SETUP)).unwrap();
        assert!(verify::<S>(&store).unwrap());

        fs::write(store.path(store::PUBLIC_INPUTS), "[7]").unwrap();
        assert!(!verify::<S>(&store).unwrap());
    }

    #[test]
    fn original_pipeline_verifies_without_the_proving_key() {
        full_pipeline::<Pinocchio<Bls12_381>>("cli-original");
    }

    #[test]
    fn groth16_pipeline_verifies_without_the_proving_key() {
        full_pipeline::<Groth16<Bls12_381>>("cli-groth16");
    }
}
