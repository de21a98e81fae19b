use serde::{Deserialize, Serialize};
use tokenguard_core::{Error, ExpectedAmount, FixedPointAmount, InterfaceSignature, Result, NATIVE_DECIMALS};

use crate::standards::InterfaceStandard;

/// Palavras comuns em domínios de golpes de airdrop
pub const DEFAULT_SUSPICIOUS_KEYWORDS: &[&str] = &["claim", "airdrop", "free"];

/// Plataformas conhecidas como legítimas
pub const DEFAULT_ALLOW_LISTED_DOMAINS: &[&str] =
    &["coinbase.com", "binance.com", "uniswap.org", "opensea.io"];

/// Número mínimo de holders antes de considerar a base concentrada
pub const DEFAULT_MIN_HOLDER_COUNT: u64 = 100;

/// Limite padrão de transferência grande, em unidades nativas
pub const DEFAULT_LARGE_THRESHOLD: &str = "10";

/// Configuração do classificador de transações
///
/// Valores monetários são strings decimais em unidades nativas (ETH),
/// convertidas sem perda para ponto fixo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Transações com valor estritamente acima deste limite são "grandes"
    pub large_threshold: String,
    /// Valor de uma transferência conhecida a localizar
    pub expected_amount: Option<String>,
    /// Tolerância em torno de `expected_amount`
    pub expected_tolerance: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            large_threshold: DEFAULT_LARGE_THRESHOLD.to_string(),
            expected_amount: None,
            expected_tolerance: "0".to_string(),
        }
    }
}

impl ClassifierConfig {
    pub fn large_threshold(&self) -> Result<FixedPointAmount> {
        FixedPointAmount::parse_units(self.large_threshold.trim(), NATIVE_DECIMALS)
    }

    pub fn expected(&self) -> Result<Option<ExpectedAmount>> {
        let amount = match &self.expected_amount {
            Some(amount) => FixedPointAmount::parse_units(amount.trim(), NATIVE_DECIMALS)?,
            None => return Ok(None),
        };
        let tolerance = FixedPointAmount::parse_units(self.expected_tolerance.trim(), NATIVE_DECIMALS)?;
        Ok(Some(ExpectedAmount { amount, tolerance }))
    }
}

/// Configuração do pontuador heurístico de risco
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub suspicious_keywords: Vec<String>,
    pub allow_listed_domains: Vec<String>,
    pub min_holder_count: u64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            suspicious_keywords: DEFAULT_SUSPICIOUS_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            allow_listed_domains: DEFAULT_ALLOW_LISTED_DOMAINS.iter().map(|s| s.to_string()).collect(),
            min_holder_count: DEFAULT_MIN_HOLDER_COUNT,
        }
    }
}

/// Configuração completa de uma análise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub classifier: ClassifierConfig,
    pub scorer: ScorerConfig,
    /// Padrão de interface exigido na verificação de conformidade
    pub required_standard: InterfaceStandard,
    /// Lista explícita que substitui `required_standard` quando presente
    pub required_interface: Option<Vec<InterfaceSignature>>,
}

impl AnalysisConfig {
    /// Carrega a configuração de um documento JSON; campos ausentes usam o padrão
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::DecodeError(format!("Falha ao ler configuração: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Valida os campos que só podem ser verificados após a leitura
    pub fn validate(&self) -> Result<()> {
        self.classifier
            .large_threshold()
            .map_err(|e| Error::ValidationError(format!("large_threshold inválido: {}", e)))?;
        self.classifier
            .expected()
            .map_err(|e| Error::ValidationError(format!("valor esperado inválido: {}", e)))?;
        if matches!(&self.required_interface, Some(list) if list.is_empty()) {
            return Err(Error::ValidationError("required_interface não pode ser vazio".to_string()));
        }
        Ok(())
    }

    /// Assinaturas exigidas na verificação de conformidade
    pub fn required_signatures(&self) -> Vec<InterfaceSignature> {
        match &self.required_interface {
            Some(list) => list.clone(),
            None => self.required_standard.signatures(),
        }
    }
}
