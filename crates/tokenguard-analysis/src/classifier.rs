use serde::Serialize;
use std::cmp::Ordering;
use tokenguard_core::{
    normalize_amount, normalize_gwei, parse_quantity, parse_timestamp, Address, Direction,
    ExpectedAmount, FixedPointAmount, NormalizedTransaction, NumericBase, RawTransaction, Result,
    NATIVE_DECIMALS,
};
use tracing::debug;

use crate::config::ClassifierConfig;

/// Quanto do histórico de transações foi de fato examinado
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransactionCoverage {
    /// Nenhuma classificação foi pedida para este relatório
    NotRequested,
    /// A lista recebida estava vazia: nada foi examinado
    NoData,
    /// A lista foi examinada por completo
    Examined {
        fetched: usize,
        involving_subject: usize,
    },
}

/// Resultado da classificação de uma lista de transações
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTransactions {
    fetched: usize,
    transactions: Vec<NormalizedTransaction>,
}

impl ClassifiedTransactions {
    pub fn coverage(&self) -> TransactionCoverage {
        if self.fetched == 0 {
            TransactionCoverage::NoData
        } else {
            TransactionCoverage::Examined {
                fetched: self.fetched,
                involving_subject: self.transactions.len(),
            }
        }
    }

    pub fn transactions(&self) -> &[NormalizedTransaction] {
        &self.transactions
    }

    pub fn large(&self) -> Vec<NormalizedTransaction> {
        find_large(&self.transactions)
    }

    /// Transações grandes ou compatíveis com o valor esperado
    pub fn flagged(&self) -> Vec<NormalizedTransaction> {
        sorted(
            self.transactions
                .iter()
                .filter(|tx| tx.large || tx.matches_expected)
                .cloned()
                .collect(),
        )
    }
}

/// Classificador de transações em relação a um endereço
#[derive(Debug, Clone)]
pub struct TransactionClassifier {
    large_threshold: FixedPointAmount,
    expected: Option<ExpectedAmount>,
}

impl TransactionClassifier {
    pub fn new(large_threshold: FixedPointAmount, expected: Option<ExpectedAmount>) -> Self {
        Self {
            large_threshold,
            expected,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        Ok(Self::new(config.large_threshold()?, config.expected()?))
    }

    pub fn large_threshold(&self) -> &FixedPointAmount {
        &self.large_threshold
    }

    pub fn expected(&self) -> Option<&ExpectedAmount> {
        self.expected.as_ref()
    }

    pub fn classify(&self, subject: &Address, txs: &[RawTransaction]) -> Result<ClassifiedTransactions> {
        let transactions = classify(subject, txs, &self.large_threshold, self.expected.as_ref())?;
        Ok(ClassifiedTransactions {
            fetched: txs.len(),
            transactions,
        })
    }
}

/// Normaliza e classifica as transações que envolvem `subject`.
///
/// A direção depende apenas da igualdade de endereços: `outgoing` se o
/// remetente for o endereço, senão `incoming` se for o destinatário. As
/// demais transações são excluídas. Um único registro malformado faz a
/// classificação inteira falhar, em vez de encurtar a lista em silêncio.
pub fn classify(
    subject: &Address,
    txs: &[RawTransaction],
    large_threshold: &FixedPointAmount,
    expected: Option<&ExpectedAmount>,
) -> Result<Vec<NormalizedTransaction>> {
    let mut normalized = Vec::with_capacity(txs.len());

    for tx in txs {
        let amount = normalize_amount(&tx.value, NumericBase::Decimal, NATIVE_DECIMALS)?;
        let from: Address = tx.from.parse()?;
        let to: Option<Address> = if tx.to.trim().is_empty() {
            None
        } else {
            Some(tx.to.parse()?)
        };

        let direction = if from == *subject {
            Direction::Outgoing
        } else if to.as_ref() == Some(subject) {
            Direction::Incoming
        } else {
            continue;
        };

        let timestamp = parse_timestamp(&tx.timestamp)?;
        let block_number = tx.block_number.as_deref().map(parse_quantity).transpose()?;
        let gas_price_gwei = tx
            .gas_price
            .as_deref()
            .map(|raw| normalize_gwei(raw, NumericBase::detect(raw)))
            .transpose()?;

        normalized.push(NormalizedTransaction {
            hash: tx.hash.clone(),
            large: amount > *large_threshold,
            matches_expected: expected.map_or(false, |e| e.matches(&amount)),
            amount,
            direction,
            timestamp,
            success: !tx.is_error,
            block_number,
            gas_price_gwei,
        });
    }

    debug!(
        subject = %subject,
        fetched = txs.len(),
        involving_subject = normalized.len(),
        "transações classificadas"
    );

    Ok(normalized)
}

/// Valor decrescente; empates pelo timestamp mais antigo
fn by_amount_then_time(a: &NormalizedTransaction, b: &NormalizedTransaction) -> Ordering {
    b.amount.cmp(&a.amount).then_with(|| a.timestamp.cmp(&b.timestamp))
}

fn sorted(mut txs: Vec<NormalizedTransaction>) -> Vec<NormalizedTransaction> {
    txs.sort_by(by_amount_then_time);
    txs
}

/// Transações marcadas como grandes, em ordem decrescente de valor
pub fn find_large(normalized: &[NormalizedTransaction]) -> Vec<NormalizedTransaction> {
    sorted(normalized.iter().filter(|tx| tx.large).cloned().collect())
}

/// Transações com `|valor - esperado| <= tolerância`, em ordem decrescente de valor
pub fn find_matching_expected(
    normalized: &[NormalizedTransaction],
    expected: &ExpectedAmount,
) -> Vec<NormalizedTransaction> {
    sorted(
        normalized
            .iter()
            .filter(|tx| expected.matches(&tx.amount))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokenguard_core::Error;

    const SUBJECT: &str = "0xc46eb37677360efdc011f4097621f15b792fa630";
    const OTHER: &str = "0x1111111111111111111111111111111111111111";

    fn eth(units: &str) -> FixedPointAmount {
        FixedPointAmount::parse_units(units, NATIVE_DECIMALS).unwrap()
    }

    fn raw(from: &str, to: &str, eth_value: &str, ts: u64) -> RawTransaction {
        RawTransaction {
            hash: format!("0x{:064x}", ts),
            from: from.to_string(),
            to: to.to_string(),
            value: eth(eth_value).raw().to_string(),
            timestamp: ts.to_string(),
            is_error: false,
            block_number: None,
            gas_price: None,
        }
    }

    fn subject() -> Address {
        SUBJECT.parse().unwrap()
    }

    #[test]
    fn direction_follows_address_equality() {
        let upper = SUBJECT.to_uppercase().replace("0X", "0x");
        let txs = vec![
            raw(&upper, OTHER, "1", 1),
            raw(OTHER, SUBJECT, "2", 2),
            raw(OTHER, "0x2222222222222222222222222222222222222222", "3", 3),
        ];
        let out = classify(&subject(), &txs, &eth("10"), None).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].direction, Direction::Outgoing);
        assert_eq!(out[1].direction, Direction::Incoming);
    }

    #[test]
    fn self_transfer_counts_as_outgoing() {
        let txs = vec![raw(SUBJECT, SUBJECT, "1", 1)];
        let out = classify(&subject(), &txs, &eth("10"), None).unwrap();
        assert_eq!(out[0].direction, Direction::Outgoing);
    }

    #[test]
    fn contract_creation_without_recipient() {
        let txs = vec![raw(SUBJECT, "", "0", 1), raw(OTHER, "", "0", 2)];
        let out = classify(&subject(), &txs, &eth("10"), None).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn large_transfers_sorted_descending() {
        let txs = vec![
            raw(OTHER, SUBJECT, "5", 10),
            raw(SUBJECT, OTHER, "12", 20),
            raw(OTHER, SUBJECT, "37", 30),
        ];
        let out = classify(&subject(), &txs, &eth("10"), None).unwrap();
        let large: Vec<String> = find_large(&out).iter().map(|tx| tx.amount.to_string()).collect();
        assert_eq!(large, vec!["37", "12"]);
    }

    #[test]
    fn threshold_is_strict_and_ties_keep_oldest_first() {
        let txs = vec![
            raw(OTHER, SUBJECT, "10", 1),
            raw(OTHER, SUBJECT, "20", 9),
            raw(OTHER, SUBJECT, "20", 3),
        ];
        let out = classify(&subject(), &txs, &eth("10"), None).unwrap();
        let large = find_large(&out);
        assert_eq!(large.len(), 2);
        assert_eq!(large[0].timestamp.timestamp(), 3);
        assert_eq!(large[1].timestamp.timestamp(), 9);
    }

    #[test]
    fn matches_expected_within_tolerance() {
        let expected = ExpectedAmount {
            amount: eth("37"),
            tolerance: eth("0.1"),
        };
        let txs = vec![
            raw(OTHER, SUBJECT, "36.95", 1),
            raw(OTHER, SUBJECT, "37.2", 2),
            raw(SUBJECT, OTHER, "37", 3),
        ];
        let out = classify(&subject(), &txs, &eth("100"), Some(&expected)).unwrap();
        assert!(out[0].matches_expected);
        assert!(!out[1].matches_expected);

        let matching = find_matching_expected(&out, &expected);
        let amounts: Vec<String> = matching.iter().map(|tx| tx.amount.to_string()).collect();
        assert_eq!(amounts, vec!["37", "36.95"]);
    }

    #[test]
    fn one_malformed_record_fails_everything() {
        let mut bad = raw(OTHER, SUBJECT, "1", 2);
        bad.value = "1e18".to_string();
        let txs = vec![raw(OTHER, SUBJECT, "50", 1), bad];
        let err = classify(&subject(), &txs, &eth("10"), None).unwrap_err();
        assert!(matches!(err, Error::MalformedAmount(_)));

        let mut bad_ts = raw(OTHER, SUBJECT, "1", 2);
        bad_ts.timestamp = "yesterday".to_string();
        let err = classify(&subject(), &[bad_ts], &eth("10"), None).unwrap_err();
        assert!(matches!(err, Error::MalformedTimestamp(_)));
    }

    #[test]
    fn optional_fields_are_normalized() {
        let mut tx = raw(OTHER, SUBJECT, "1", 1);
        tx.block_number = Some("0x112a880".to_string());
        tx.gas_price = Some("20000000000".to_string());
        tx.is_error = true;
        let out = classify(&subject(), &[tx], &eth("10"), None).unwrap();
        assert_eq!(out[0].block_number, Some(18_000_000));
        assert_eq!(out[0].gas_price_gwei.unwrap().to_string(), "20");
        assert!(!out[0].success);
    }

    #[test]
    fn empty_input_reports_no_data() {
        let classifier = TransactionClassifier::new(eth("10"), None);
        let classified = classifier.classify(&subject(), &[]).unwrap();
        assert!(classified.transactions().is_empty());
        assert!(classified.large().is_empty());
        assert_eq!(classified.coverage(), TransactionCoverage::NoData);
    }

    #[test]
    fn unrelated_transactions_are_examined_not_missing() {
        let classifier = TransactionClassifier::new(eth("10"), None);
        let txs = vec![raw(OTHER, OTHER, "50", 1)];
        let classified = classifier.classify(&subject(), &txs).unwrap();
        assert_eq!(
            classified.coverage(),
            TransactionCoverage::Examined {
                fetched: 1,
                involving_subject: 0
            }
        );
    }
}
