//! JSON files in the working directory.
use std::{
    fs, io,
    path::{Path, PathBuf},
};

use qap_snark::{serialization::field_vec, Protocol};
use ark_ff::PrimeField;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

pub const CIRCUIT: &str = "circuit.json";
pub const PRIVATE_INPUTS: &str = "private_inputs.json";
pub const PUBLIC_INPUTS: &str = "public_inputs.json";
pub const COMPILED_CIRCUIT: &str = "compiled_circuit.json";
pub const TRUSTED_SETUP: &str = "trusted_setup.json";
pub const VERIFYING_KEY: &str = "verifying_key.json";
pub const PROOF: &str = "proof.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("could not access {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is corrupt", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} was generated for the {found} protocol, not {expected}", path.display())]
    ProtocolMismatch {
        path: PathBuf,
        expected: Protocol,
        found: Protocol,
    },
}

/// A list of input values, as JSON numbers or decimal strings.
#[derive(Serialize, Deserialize)]
#[serde(transparent, bound = "")]
pub struct Inputs<F: PrimeField>(#[serde(with = "field_vec")] pub Vec<F>);

/// A key or proof together with the protocol it belongs to.
#[derive(Serialize, Deserialize)]
pub struct Tagged<T> {
    pub protocol: Protocol,
    pub contents: T,
}

impl<T> Tagged<T> {
    pub fn new(protocol: Protocol, contents: T) -> Self {
        Self { protocol, contents }
    }
}

#[derive(Deserialize)]
struct Header {
    protocol: Protocol,
}

pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn read_text(&self, path: &Path) -> Result<String, StoreError> {
        fs::read_to_string(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::Missing(path.to_path_buf()),
            _ => StoreError::Io {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    pub fn read<T: DeserializeOwned>(&self, name: &str) -> Result<T, StoreError> {
        let path = self.path(name);
        let text = self.read_text(&path)?;
        serde_json::from_str(&text).map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Read the contents of a [`Tagged`] file, refusing files written for the
    /// other protocol.
    pub fn read_tagged<T: DeserializeOwned>(&self, name: &str, expected: Protocol) -> Result<T, StoreError> {
        let path = self.path(name);
        let text = self.read_text(&path)?;
        let corrupt = |source: serde_json::Error| StoreError::Corrupt {
            path: path.clone(),
            source,
        };

        let Header { protocol } = serde_json::from_str(&text).map_err(corrupt)?;
        if protocol != expected {
            return Err(StoreError::ProtocolMismatch {
                path: path.clone(),
                expected,
                found: protocol,
            });
        }
        let tagged: Tagged<T> = serde_json::from_str(&text).map_err(corrupt)?;
        Ok(tagged.contents)
    }

    pub fn write<T: Serialize>(&self, name: &str, value: &T) -> Result<PathBuf, StoreError> {
        let path = self.path(name);
        let json = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "wrote file");
        Ok(path)
    }
}

/// A fresh store under the system temporary directory.
#[cfg(test)]
pub(crate) fn scratch(name: &str) -> Store {
    let dir = std::env::temp_dir().join(format!("qapsnark-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    Store::new(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;

    #[test]
    fn missing_and_corrupt_files_are_distinguished() {
        let store = scratch("errors");
        assert!(matches!(
            store.read::<Inputs<Fr>>(PUBLIC_INPUTS),
            Err(StoreError::Missing(_))
        ));

        fs::write(store.path(PUBLIC_INPUTS), "[1, \"two\"]").unwrap();
        assert!(matches!(
            store.read::<Inputs<Fr>>(PUBLIC_INPUTS),
            Err(StoreError::Corrupt { .. })
        ));

        fs::write(store.path(PUBLIC_INPUTS), "[6, \"-1\"]").unwrap();
        let Inputs(values) = store.read::<Inputs<Fr>>(PUBLIC_INPUTS).unwrap();
        assert_eq!(values, vec![Fr::from(6u64), -Fr::from(1u64)]);
    }

    #[test]
    fn protocol_tag_is_enforced() {
        let store = scratch("tags");
        store.write(PROOF, &Tagged::new(Protocol::Groth16, 7u32)).unwrap();

        let back: u32 = store.read_tagged(PROOF, Protocol::Groth16).unwrap();
        assert_eq!(back, 7);
        assert!(matches!(
            store.read_tagged::<u32>(PROOF, Protocol::Original),
            Err(StoreError::ProtocolMismatch {
                found: Protocol::Groth16,
                ..
            })
        ));
    }
}
