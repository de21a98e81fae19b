use serde::Deserialize;
use tokenguard_core::{Error, InterfaceSignature, Result};

#[derive(Debug, Deserialize)]
struct AbiEntry {
    #[serde(rename = "type", default = "default_entry_type")]
    kind: String,
    name: Option<String>,
    #[serde(default)]
    inputs: Vec<AbiParam>,
}

#[derive(Debug, Deserialize)]
struct AbiParam {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    components: Vec<AbiParam>,
}

// No ABI JSON do Solidity, entradas sem "type" são funções
fn default_entry_type() -> String {
    "function".to_string()
}

impl AbiParam {
    /// Tipo canônico, expandindo `tuple` nos seus componentes
    fn canonical_type(&self) -> String {
        match self.kind.strip_prefix("tuple") {
            Some(suffix) => {
                let members: Vec<String> = self.components.iter().map(|c| c.canonical_type()).collect();
                format!("({}){}", members.join(","), suffix)
            }
            None => self.kind.clone(),
        }
    }
}

/// Extrai as assinaturas de função de um ABI JSON
pub fn signatures_from_abi(abi_json: &str) -> Result<Vec<InterfaceSignature>> {
    let entries: Vec<AbiEntry> = serde_json::from_str(abi_json)
        .map_err(|e| Error::DecodeError(format!("ABI inválido: {}", e)))?;

    let mut signatures = Vec::new();
    for entry in entries.iter().filter(|e| e.kind == "function") {
        let name = entry
            .name
            .as_deref()
            .ok_or_else(|| Error::DecodeError("função sem nome no ABI".to_string()))?;
        let types: Vec<String> = entry.inputs.iter().map(|p| p.canonical_type()).collect();
        let signature = InterfaceSignature::from_parts(name, &types)
            .map_err(|e| Error::DecodeError(format!("assinatura inválida no ABI: {}", e)))?;
        signatures.push(signature);
    }

    Ok(signatures)
}
