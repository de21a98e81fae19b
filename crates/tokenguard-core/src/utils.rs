/*!
 * TokenGuard Utils
 *
 * Normalização de valores numéricos no formato do gateway
 */

use chrono::{DateTime, Utc};
use ethereum_types::U256;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use tiny_keccak::{Hasher, Keccak};

use crate::error::{Error, Result};
use crate::types::{DisplayAmount, FixedPointAmount, NumericBase, GWEI_DECIMALS};

/// Converte um inteiro não-negativo em string para ponto fixo exato.
///
/// Aceita prefixo `0x` quando a base é hexadecimal. Qualquer outro caractere,
/// string vazia ou estouro de 256 bits resulta em `MalformedAmount`.
pub fn normalize_amount(raw: &str, base: NumericBase, decimals: u8) -> Result<FixedPointAmount> {
    let value = parse_integer(raw, base)?;
    FixedPointAmount::new(value, decimals)
}

/// Converte um preço de gás em wei para gwei
pub fn normalize_gwei(raw: &str, base: NumericBase) -> Result<FixedPointAmount> {
    normalize_amount(raw, base, GWEI_DECIMALS)
}

/// Lê uma quantidade inteira (bloco, gás) detectando a base pelo prefixo `0x`
pub fn parse_quantity(raw: &str) -> Result<u64> {
    let value = parse_integer(raw, NumericBase::detect(raw))?;
    if value > U256::from(u64::MAX) {
        return Err(Error::MalformedAmount(raw.to_string()));
    }
    Ok(value.as_u64())
}

fn parse_integer(raw: &str, base: NumericBase) -> Result<U256> {
    let malformed = || Error::MalformedAmount(raw.to_string());
    let trimmed = raw.trim();

    let digits = match base {
        NumericBase::Hex => trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed),
        NumericBase::Decimal => trimmed,
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(base.radix())) {
        return Err(malformed());
    }

    U256::from_str_radix(digits, base.radix()).map_err(|_| malformed())
}

/// Converte segundos desde a época (inteiro decimal) para um instante UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let malformed = || Error::MalformedTimestamp(raw.to_string());
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let secs: i64 = trimmed.parse().map_err(|_| malformed())?;
    DateTime::from_timestamp(secs, 0).ok_or_else(malformed)
}

/// Multiplica uma quantidade por um preço externo, arredondando em centavos.
///
/// Não faz I/O; a única falha possível é `MalformedAmount` quando o valor
/// não cabe na representação decimal.
pub fn to_display_currency(
    amount: &FixedPointAmount,
    price: Decimal,
    currency: &str,
) -> Result<DisplayAmount> {
    let malformed = || Error::MalformedAmount(amount.to_string());

    // Decimal arredonda casas além de 28, o que é irrelevante para exibição
    let units = Decimal::from_str(&amount.to_string()).map_err(|_| malformed())?;
    let value = units
        .checked_mul(price)
        .ok_or_else(malformed)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Ok(DisplayAmount {
        value,
        currency: currency.to_string(),
    })
}

/// Calcula o hash Keccak-256 de dados
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    let mut result = [0u8; 32];
    hasher.update(data);
    hasher.finalize(&mut result);
    result
}
