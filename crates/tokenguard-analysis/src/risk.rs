use serde::Serialize;
use std::fmt;
use tokenguard_core::{RiskSignal, SignalKind};
use tracing::debug;
use url::Url;

use crate::config::ScorerConfig;

/// Nível discreto de risco
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `HIGH` se há mais fatores de risco que de segurança, `MEDIUM` se há
    /// algum fator de risco, `LOW` caso contrário
    pub fn from_counts(risk_factors: usize, safety_factors: usize) -> Self {
        if risk_factors > safety_factors {
            RiskLevel::High
        } else if risk_factors > 0 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskLevel::High => "DO NOT PROCEED",
            RiskLevel::Medium => "PROCEED WITH EXTREME CAUTION",
            RiskLevel::Low => "APPEARS SAFER BUT VERIFY",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Veredito explicável: cada fator que contribuiu aparece listado
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskVerdict {
    level: RiskLevel,
    risk_factors: Vec<String>,
    safety_factors: Vec<String>,
    recommendation: String,
}

impl RiskVerdict {
    pub fn level(&self) -> RiskLevel {
        self.level
    }

    pub fn risk_factors(&self) -> &[String] {
        &self.risk_factors
    }

    pub fn safety_factors(&self) -> &[String] {
        &self.safety_factors
    }

    pub fn recommendation(&self) -> &str {
        &self.recommendation
    }
}

/// Pontuador baseado em tabela de regras
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScorerConfig,
}

impl RiskScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    pub fn score(&self, signals: &[RiskSignal]) -> RiskVerdict {
        score(signals, &self.config)
    }

    pub fn signals_from_url(&self, url: &str) -> Vec<RiskSignal> {
        signals_from_url(url, &self.config)
    }
}

/// Reduz sinais independentes a um veredito.
///
/// O resultado não depende da ordem dos sinais: os fatores são ordenados
/// pelo tipo de sinal e depois pelo texto.
pub fn score(signals: &[RiskSignal], config: &ScorerConfig) -> RiskVerdict {
    let allow_listed = signals.iter().any(|s| matches!(s, RiskSignal::AllowListed(true)));

    let mut risk: Vec<(SignalKind, String)> = Vec::new();
    let mut safety: Vec<(SignalKind, String)> = Vec::new();

    for signal in signals {
        let kind = signal.kind();
        match signal {
            RiskSignal::DomainKeyword(value) => {
                if allow_listed {
                    continue;
                }
                let value = value.to_lowercase();
                let matched: Vec<&str> = config
                    .suspicious_keywords
                    .iter()
                    .map(|k| k.trim())
                    .filter(|k| !k.is_empty() && value.contains(&k.to_lowercase()))
                    .collect();
                if !matched.is_empty() {
                    risk.push((kind, format!("Suspicious domain keywords detected ({})", matched.join(", "))));
                }
            }
            RiskSignal::TransportScheme(scheme) => match scheme.trim().to_lowercase().as_str() {
                "http" => risk.push((kind, "Non-encrypted connection (HTTP)".to_string())),
                "https" => safety.push((kind, "Encrypted connection (HTTPS)".to_string())),
                _ => {}
            },
            RiskSignal::AllowListed(true) => {
                safety.push((kind, "Known legitimate platform".to_string()));
            }
            RiskSignal::Verified(true) => {
                safety.push((kind, "Verified contract source code".to_string()));
            }
            RiskSignal::LiquidityLocked(false) => {
                risk.push((kind, "Liquidity is not locked".to_string()));
            }
            RiskSignal::LiquidityLocked(true) => {
                safety.push((kind, "Liquidity is locked".to_string()));
            }
            RiskSignal::HolderCount(count) if *count < config.min_holder_count => {
                risk.push((
                    kind,
                    format!("Thin holder base ({} holders, minimum {})", count, config.min_holder_count),
                ));
            }
            // Ausência de verificação ou de lista não é evidência de risco
            RiskSignal::AllowListed(false) | RiskSignal::Verified(false) | RiskSignal::HolderCount(_) => {}
        }
    }

    risk.sort();
    safety.sort();

    let level = RiskLevel::from_counts(risk.len(), safety.len());
    debug!(%level, risk = risk.len(), safety = safety.len(), "veredito de risco calculado");

    RiskVerdict {
        level,
        risk_factors: risk.into_iter().map(|(_, text)| text).collect(),
        safety_factors: safety.into_iter().map(|(_, text)| text).collect(),
        recommendation: level.recommendation().to_string(),
    }
}

/// Extrai sinais de uma URL ou domínio informado pelo usuário
///
/// O host é obtido por um parser WHATWG; entradas sem esquema são lidas
/// como `https://`. Uma URL que não pode ser interpretada nunca é
/// considerada parte da lista de plataformas conhecidas.
pub fn signals_from_url(url: &str, config: &ScorerConfig) -> Vec<RiskSignal> {
    let lowered = url.trim().to_lowercase();
    let mut signals = Vec::new();

    let (scheme, rest) = match lowered.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, lowered.as_str()),
    };

    if let Some(scheme) = scheme {
        signals.push(RiskSignal::TransportScheme(scheme.to_string()));
    }

    if rest.is_empty() {
        return signals;
    }

    let allow_listed = match host_of(&lowered, scheme.is_some()) {
        Some(host) => is_allow_listed(&host, config),
        None => {
            debug!(url = %lowered, "URL não interpretável; host desconhecido");
            false
        }
    };

    signals.push(RiskSignal::DomainKeyword(rest.to_string()));
    signals.push(RiskSignal::AllowListed(allow_listed));
    signals
}

/// Host da URL, sem o ponto final de FQDN
fn host_of(input: &str, has_scheme: bool) -> Option<String> {
    let parsed = if has_scheme {
        Url::parse(input)
    } else {
        Url::parse(&format!("https://{}", input))
    }
    .ok()?;

    let host = parsed.host_str()?.trim_end_matches('.');
    if host.is_empty() {
        return None;
    }
    Some(host.to_string())
}

fn is_allow_listed(host: &str, config: &ScorerConfig) -> bool {
    config.allow_listed_domains.iter().any(|domain| {
        let domain = domain.trim().trim_end_matches('.').to_lowercase();
        !domain.is_empty() && (host == domain || host.ends_with(&format!(".{}", domain)))
    })
}
