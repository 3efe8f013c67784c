//! Contract interface descriptors.
//!
//! A descriptor lists a contract's address and its methods with ordered
//! parameter declarations. Parameter lists are checked against it before any
//! request leaves the client.

use serde::Deserialize;
use std::path::Path;

use crate::ledger::types::{CallKind, ContractCallSpec, LedgerError, LedgerResult};

/// Declared parameter of a contract method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    /// Example value shown when collecting input.
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub max_length: Option<usize>,
}

/// Declared contract method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    #[serde(alias = "type")]
    pub kind: CallKind,
    #[serde(default)]
    pub params: Vec<ParamSpec>,
}

/// Contract interface descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContractInterface {
    pub address: String,
    #[serde(default)]
    pub methods: Vec<MethodSpec>,
}

impl ContractInterface {
    pub fn from_json(content: &str) -> LedgerResult<Self> {
        serde_json::from_str(content).map_err(|e| LedgerError::InvalidInterface(e.to_string()))
    }

    /// Load a descriptor from a JSON file.
    pub fn from_file(path: &Path) -> LedgerResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::InvalidInterface(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn method(&self, name: &str) -> Option<&MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Validate `params` against the declared method and build a call spec.
    pub fn prepare(&self, method: &str, params: Vec<String>) -> LedgerResult<ContractCallSpec> {
        let spec = self
            .method(method)
            .ok_or_else(|| LedgerError::UnknownMethod(method.to_string()))?;

        if params.len() != spec.params.len() {
            return Err(LedgerError::ParamCount {
                method: method.to_string(),
                expected: spec.params.len(),
                actual: params.len(),
            });
        }

        for (declared, value) in spec.params.iter().zip(&params) {
            if let Some(max_length) = declared.max_length {
                if value.chars().count() > max_length {
                    return Err(LedgerError::ParamTooLong {
                        method: method.to_string(),
                        param: declared.name.clone(),
                        max_length,
                    });
                }
            }
        }

        Ok(ContractCallSpec {
            contract_address: self.address.clone(),
            method: method.to_string(),
            params,
            kind: spec.kind,
        })
    }
}
