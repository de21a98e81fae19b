use serde::Serialize;
use std::collections::HashSet;
use tokenguard_core::{Error, InterfaceSignature, Result};
use tracing::debug;

/// Presença estrutural das assinaturas exigidas
///
/// `present` e `missing` particionam exatamente o conjunto exigido,
/// ambos na ordem em que as assinaturas foram exigidas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    present: Vec<InterfaceSignature>,
    missing: Vec<InterfaceSignature>,
    fully_compliant: bool,
}

impl ComplianceResult {
    pub fn present(&self) -> &[InterfaceSignature] {
        &self.present
    }

    pub fn missing(&self) -> &[InterfaceSignature] {
        &self.missing
    }

    pub fn fully_compliant(&self) -> bool {
        self.fully_compliant
    }
}

/// Compara a interface exigida com a observada.
///
/// Não interpreta a ausência (pode ser outro padrão equivalente); apenas
/// reporta o que está presente e o que falta.
pub fn check_compliance(
    required: &[InterfaceSignature],
    observed: &HashSet<InterfaceSignature>,
) -> Result<ComplianceResult> {
    if required.is_empty() {
        return Err(Error::IncompleteInput(
            "conjunto de assinaturas exigidas vazio".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(required.len());
    let mut present = Vec::new();
    let mut missing = Vec::new();

    for signature in required {
        if !seen.insert(signature) {
            continue;
        }
        if observed.contains(signature) {
            present.push(signature.clone());
        } else {
            missing.push(signature.clone());
        }
    }

    debug!(
        present = present.len(),
        missing = missing.len(),
        "verificação de conformidade concluída"
    );

    Ok(ComplianceResult {
        fully_compliant: missing.is_empty(),
        present,
        missing,
    })
}
