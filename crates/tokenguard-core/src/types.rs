/*!
 * TokenGuard Types
 *
 * Tipos comuns usados em toda a workspace TokenGuard
 */

use chrono::{DateTime, Utc};
use ethereum_types::{H160, U256, U512};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

pub use crate::signature::InterfaceSignature;

/// Casas decimais da moeda nativa (wei → ETH)
pub const NATIVE_DECIMALS: u8 = 18;

/// Casas decimais de gwei em relação ao wei
pub const GWEI_DECIMALS: u8 = 9;

/// Maior número de casas decimais aceito; 10^77 ainda cabe em um U256
pub const MAX_DECIMALS: u8 = 77;

/// Base numérica de um valor recebido do gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericBase {
    Decimal,
    Hex,
}

impl NumericBase {
    pub fn radix(&self) -> u32 {
        match self {
            NumericBase::Decimal => 10,
            NumericBase::Hex => 16,
        }
    }

    /// Hexadecimal quando a string tem prefixo `0x`, decimal caso contrário
    pub fn detect(raw: &str) -> Self {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            NumericBase::Hex
        } else {
            NumericBase::Decimal
        }
    }
}

/// Endereço de 20 bytes, sempre exibido em hexadecimal minúsculo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(H160);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(H160::from(bytes))
    }

    pub fn as_h160(&self) -> &H160 {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl From<H160> for Address {
    fn from(value: H160) -> Self {
        Self(value)
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex.len() != 40 {
            return Err(Error::MalformedAddress(s.to_string()));
        }

        H160::from_str(hex)
            .map(Self)
            .map_err(|_| Error::MalformedAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Quantidade em ponto fixo: inteiro exato na menor unidade mais o número de casas.
///
/// A divisão por `10^decimals` acontece apenas na formatação. Comparações
/// entre quantidades com casas diferentes são feitas por valor.
#[derive(Debug, Clone, Copy)]
pub struct FixedPointAmount {
    raw: U256,
    decimals: u8,
}

impl FixedPointAmount {
    pub fn new(raw: U256, decimals: u8) -> Result<Self> {
        if decimals > MAX_DECIMALS {
            return Err(Error::MalformedAmount(format!(
                "{} casas decimais excede o máximo de {}",
                decimals, MAX_DECIMALS
            )));
        }
        Ok(Self { raw, decimals })
    }

    pub fn zero(decimals: u8) -> Result<Self> {
        Self::new(U256::zero(), decimals)
    }

    /// Converte uma string decimal em unidades inteiras ("12.5") para ponto fixo exato
    pub fn parse_units(s: &str, decimals: u8) -> Result<Self> {
        let malformed = || Error::MalformedAmount(s.to_string());
        if decimals > MAX_DECIMALS {
            return Err(malformed());
        }

        let (integer, fraction) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };

        if integer.is_empty() || !integer.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) || fraction.len() > decimals as usize {
            return Err(malformed());
        }
        if s.contains('.') && fraction.is_empty() {
            return Err(malformed());
        }

        let integer = U256::from_dec_str(integer).map_err(|_| malformed())?;
        let mut padded = fraction.to_string();
        padded.extend(std::iter::repeat('0').take(decimals as usize - fraction.len()));
        let fraction = if padded.is_empty() {
            U256::zero()
        } else {
            U256::from_dec_str(&padded).map_err(|_| malformed())?
        };

        let raw = integer
            .checked_mul(U256::exp10(decimals as usize))
            .and_then(|scaled| scaled.checked_add(fraction))
            .ok_or_else(malformed)?;

        Self::new(raw, decimals)
    }

    /// Valor inteiro na menor unidade
    pub fn raw(&self) -> U256 {
        self.raw
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn is_zero(&self) -> bool {
        self.raw.is_zero()
    }

    fn scaled_to(&self, decimals: u8) -> U512 {
        U512::from(self.raw) * U512::exp10((decimals - self.decimals) as usize)
    }

    /// Verifica se `|self - target| <= tolerance`, sem perda de precisão
    pub fn within(&self, target: &FixedPointAmount, tolerance: &FixedPointAmount) -> bool {
        let decimals = self.decimals.max(target.decimals).max(tolerance.decimals);
        let a = self.scaled_to(decimals);
        let b = target.scaled_to(decimals);
        let diff = if a >= b { a - b } else { b - a };
        diff <= tolerance.scaled_to(decimals)
    }

    fn split(&self) -> (U256, String) {
        if self.decimals == 0 {
            return (self.raw, String::new());
        }
        let divisor = U256::exp10(self.decimals as usize);
        let integer_part = self.raw / divisor;
        let fractional_str = (self.raw % divisor).to_string();

        // Completa com zeros à esquerda até o número de casas
        let mut padded = "0".repeat(self.decimals as usize - fractional_str.len());
        padded.push_str(&fractional_str);
        (integer_part, padded)
    }

    /// Formata com exatamente `decimals` casas, sem remover zeros
    pub fn to_fixed_string(&self) -> String {
        let (integer, fraction) = self.split();
        if fraction.is_empty() {
            integer.to_string()
        } else {
            format!("{}.{}", integer, fraction)
        }
    }
}

impl PartialEq for FixedPointAmount {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FixedPointAmount {}

impl PartialOrd for FixedPointAmount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FixedPointAmount {
    fn cmp(&self, other: &Self) -> Ordering {
        if self.decimals == other.decimals {
            return self.raw.cmp(&other.raw);
        }
        let decimals = self.decimals.max(other.decimals);
        self.scaled_to(decimals).cmp(&other.scaled_to(decimals))
    }
}

impl fmt::Display for FixedPointAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (integer, mut fraction) = self.split();

        // Remove zeros à direita
        while fraction.ends_with('0') {
            fraction.pop();
        }

        if fraction.is_empty() {
            write!(f, "{}", integer)
        } else {
            write!(f, "{}.{}", integer, fraction)
        }
    }
}

impl Serialize for FixedPointAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Valor estimado em moeda de exibição (ex.: USD)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayAmount {
    pub value: Decimal,
    pub currency: String,
}

impl fmt::Display for DisplayAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.currency)
    }
}

/// Transação como recebida do gateway, no formato de um block explorer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    pub hash: String,
    pub from: String,
    /// Vazio em transações de criação de contrato
    #[serde(default)]
    pub to: String,
    /// Valor em wei, inteiro decimal
    pub value: String,
    /// Segundos desde a época, inteiro decimal
    #[serde(rename = "timeStamp")]
    pub timestamp: String,
    #[serde(rename = "isError", default, with = "error_flag")]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_price: Option<String>,
}

/// Explorers enviam `isError` como "0"/"1"; aceita também booleanos
mod error_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(if *value { "1" } else { "0" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(b) => Ok(b),
            Flag::Text(s) => match s.trim() {
                "0" | "" => Ok(false),
                "1" => Ok(true),
                other => Err(serde::de::Error::custom(format!("isError inválido: {}", other))),
            },
        }
    }
}

/// Direção de uma transação em relação ao endereço analisado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Incoming,
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => write!(f, "incoming"),
            Direction::Outgoing => write!(f, "outgoing"),
        }
    }
}

/// Transação normalizada em relação a um endereço
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedTransaction {
    pub hash: String,
    pub amount: FixedPointAmount,
    pub direction: Direction,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_price_gwei: Option<FixedPointAmount>,
    /// Valor acima do limite de transferência grande
    pub large: bool,
    /// Valor dentro da tolerância do valor esperado
    pub matches_expected: bool,
}

/// Valor esperado e tolerância para busca de uma transferência conhecida
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpectedAmount {
    pub amount: FixedPointAmount,
    pub tolerance: FixedPointAmount,
}

impl ExpectedAmount {
    pub fn matches(&self, amount: &FixedPointAmount) -> bool {
        amount.within(&self.amount, &self.tolerance)
    }
}

/// Sinal observado de forma independente; ainda não é um julgamento
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RiskSignal {
    /// Trecho de domínio/URL a comparar com as palavras suspeitas
    DomainKeyword(String),
    /// Esquema de transporte ("http", "https", ...)
    TransportScheme(String),
    AllowListed(bool),
    Verified(bool),
    LiquidityLocked(bool),
    HolderCount(u64),
}

/// Tipo de um sinal, na ordem em que os fatores são listados
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignalKind {
    DomainKeyword,
    TransportScheme,
    AllowListed,
    Verified,
    LiquidityLocked,
    HolderCount,
}

impl RiskSignal {
    pub fn kind(&self) -> SignalKind {
        match self {
            RiskSignal::DomainKeyword(_) => SignalKind::DomainKeyword,
            RiskSignal::TransportScheme(_) => SignalKind::TransportScheme,
            RiskSignal::AllowListed(_) => SignalKind::AllowListed,
            RiskSignal::Verified(_) => SignalKind::Verified,
            RiskSignal::LiquidityLocked(_) => SignalKind::LiquidityLocked,
            RiskSignal::HolderCount(_) => SignalKind::HolderCount,
        }
    }
}

/// Saldo retornado pelo gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    pub value_wei: String,
}

/// Interface declarada de um contrato
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractInterface {
    pub signatures: Vec<InterfaceSignature>,
    /// Código-fonte verificado no explorer
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_is_case_insensitive() {
        let lower: Address = "0xc46eb37677360efdc011f4097621f15b792fa630".parse().unwrap();
        let mixed: Address = "0xC46EB37677360EFDC011F4097621f15b792fa630".parse().unwrap();
        assert_eq!(lower, mixed);
        assert_eq!(mixed.to_string(), "0xc46eb37677360efdc011f4097621f15b792fa630");
    }

    #[test]
    fn address_rejects_wrong_length() {
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzz6eb37677360efdc011f4097621f15b792fa630".parse::<Address>().is_err());
    }

    #[test]
    fn address_rejects_malformed_hex() {
        for bad in [
            "",
            "0x",
            "0x0x6eb37677360efdc011f4097621f15b792fa630",
            "0xc46eb37677360efdc011f4097621f15b792fa63 ",
            "0xc46eb37677360efdc011f4097621f15b792fa6301",
            "c46eb37677360efdc011f4097621f15b792fa63g",
        ] {
            assert!(
                matches!(bad.parse::<Address>(), Err(Error::MalformedAddress(_))),
                "{bad:?} deveria falhar"
            );
        }

        let bare: Address = "c46eb37677360efdc011f4097621f15b792fa630".parse().unwrap();
        let upper: Address = "0XC46EB37677360EFDC011F4097621F15B792FA630".parse().unwrap();
        assert_eq!(bare, upper);
        assert_eq!(bare.as_bytes()[0], 0xc4);
    }

    #[test]
    fn parse_units_is_exact() {
        let amount = FixedPointAmount::parse_units("12.5", 18).unwrap();
        assert_eq!(amount.raw(), U256::from_dec_str("12500000000000000000").unwrap());
        assert_eq!(amount.to_string(), "12.5");
        assert_eq!(amount.to_fixed_string(), "12.500000000000000000");
    }

    #[test]
    fn parse_units_rejects_excess_precision() {
        assert!(FixedPointAmount::parse_units("1.123", 2).is_err());
        assert!(FixedPointAmount::parse_units("-1", 2).is_err());
        assert!(FixedPointAmount::parse_units("1.", 2).is_err());
        assert!(FixedPointAmount::parse_units("", 2).is_err());
    }

    #[test]
    fn amounts_compare_by_value_across_decimals() {
        let a = FixedPointAmount::parse_units("1.5", 18).unwrap();
        let b = FixedPointAmount::parse_units("1.5", 2).unwrap();
        let c = FixedPointAmount::parse_units("1.49", 2).unwrap();
        assert_eq!(a, b);
        assert!(c < a);
    }

    #[test]
    fn within_tolerance_is_symmetric() {
        let target = FixedPointAmount::parse_units("37", 18).unwrap();
        let tolerance = FixedPointAmount::parse_units("0.5", 18).unwrap();
        let above = FixedPointAmount::parse_units("37.5", 18).unwrap();
        let below = FixedPointAmount::parse_units("36.4", 18).unwrap();
        assert!(above.within(&target, &tolerance));
        assert!(!below.within(&target, &tolerance));
    }

    #[test]
    fn raw_transaction_reads_explorer_json() {
        let json = r#"{
            "hash": "0xabc",
            "from": "0xC46EB37677360EFDC011F4097621F15B792FA630",
            "to": "",
            "value": "1000000000000000000",
            "timeStamp": "1700000000",
            "isError": "1",
            "blockNumber": "18000000"
        }"#;
        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert!(tx.is_error);
        assert!(tx.to.is_empty());
        assert_eq!(tx.block_number.as_deref(), Some("18000000"));
        assert_eq!(tx.gas_price, None);
    }

    #[test]
    fn risk_signal_uses_kind_value_shape() {
        let signal: RiskSignal =
            serde_json::from_str(r#"{"kind":"transportScheme","value":"https"}"#).unwrap();
        assert_eq!(signal, RiskSignal::TransportScheme("https".into()));
        assert_eq!(signal.kind(), SignalKind::TransportScheme);
    }
}
