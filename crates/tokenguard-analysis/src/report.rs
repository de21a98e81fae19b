use serde::Serialize;
use std::fmt;
use tokenguard_core::{Address, DisplayAmount, FixedPointAmount, NormalizedTransaction};

use crate::classifier::{ClassifiedTransactions, TransactionCoverage};
use crate::compliance::ComplianceResult;
use crate::risk::RiskVerdict;

/// Relatório imutável de uma análise
///
/// Todos os campos são cópias próprias; nada referencia o estado do chamador,
/// então o relatório não muda depois de criado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    subject: Address,
    coverage: TransactionCoverage,
    flagged_transactions: Vec<NormalizedTransaction>,
    compliance: Option<ComplianceResult>,
    risk: Option<RiskVerdict>,
    balance: Option<FixedPointAmount>,
    balance_display: Option<DisplayAmount>,
}

/// Monta o relatório a partir dos resultados já calculados
pub fn build_report(
    subject: Address,
    transactions: Option<&ClassifiedTransactions>,
    compliance: Option<ComplianceResult>,
    risk: Option<RiskVerdict>,
) -> AnalysisReport {
    let (coverage, flagged_transactions) = match transactions {
        Some(classified) => (classified.coverage(), classified.flagged()),
        None => (TransactionCoverage::NotRequested, Vec::new()),
    };

    AnalysisReport {
        subject,
        coverage,
        flagged_transactions,
        compliance,
        risk,
        balance: None,
        balance_display: None,
    }
}

impl AnalysisReport {
    /// Anexa o saldo nativo e sua estimativa em moeda de exibição
    pub fn with_balance(mut self, balance: FixedPointAmount, display: Option<DisplayAmount>) -> Self {
        self.balance = Some(balance);
        self.balance_display = display;
        self
    }

    pub fn subject(&self) -> &Address {
        &self.subject
    }

    pub fn coverage(&self) -> TransactionCoverage {
        self.coverage
    }

    /// Indica que nenhuma transação foi examinada, o que não equivale a "nada encontrado"
    pub fn no_data_examined(&self) -> bool {
        !matches!(self.coverage, TransactionCoverage::Examined { .. })
    }

    /// Transações grandes ou compatíveis com o valor esperado
    pub fn flagged_transactions(&self) -> &[NormalizedTransaction] {
        &self.flagged_transactions
    }

    pub fn large_transfers(&self) -> impl Iterator<Item = &NormalizedTransaction> {
        self.flagged_transactions.iter().filter(|tx| tx.large)
    }

    pub fn expected_matches(&self) -> impl Iterator<Item = &NormalizedTransaction> {
        self.flagged_transactions.iter().filter(|tx| tx.matches_expected)
    }

    pub fn compliance(&self) -> Option<&ComplianceResult> {
        self.compliance.as_ref()
    }

    pub fn risk(&self) -> Option<&RiskVerdict> {
        self.risk.as_ref()
    }

    pub fn balance(&self) -> Option<&FixedPointAmount> {
        self.balance.as_ref()
    }

    pub fn balance_display(&self) -> Option<&DisplayAmount> {
        self.balance_display.as_ref()
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Subject: {}", self.subject)?;

        if let Some(balance) = &self.balance {
            match &self.balance_display {
                Some(display) => writeln!(f, "Balance: {} ETH (~{})", balance, display)?,
                None => writeln!(f, "Balance: {} ETH", balance)?,
            }
        }

        match self.coverage {
            TransactionCoverage::NotRequested => writeln!(f, "Transactions: not requested")?,
            TransactionCoverage::NoData => {
                writeln!(f, "Transactions: NO DATA EXAMINED (this is not evidence that nothing exists)")?
            }
            TransactionCoverage::Examined { fetched, involving_subject } => {
                writeln!(
                    f,
                    "Transactions: {} examined, {} involving subject, {} flagged",
                    fetched,
                    involving_subject,
                    self.flagged_transactions.len()
                )?;
                for tx in &self.flagged_transactions {
                    let mut tags = Vec::new();
                    if tx.large {
                        tags.push("large");
                    }
                    if tx.matches_expected {
                        tags.push("expected");
                    }
                    writeln!(
                        f,
                        "  {} {} ETH {} [{}] {}",
                        tx.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        tx.amount,
                        tx.direction,
                        tags.join(","),
                        tx.hash
                    )?;
                }
            }
        }

        if let Some(compliance) = &self.compliance {
            if compliance.fully_compliant() {
                writeln!(f, "Interface: fully compliant ({} methods)", compliance.present().len())?;
            } else {
                writeln!(f, "Interface: missing {} method(s)", compliance.missing().len())?;
                for sig in compliance.missing() {
                    writeln!(f, "  - {}", sig)?;
                }
            }
        }

        if let Some(risk) = &self.risk {
            writeln!(f, "Risk: {} => {}", risk.level(), risk.recommendation())?;
            for factor in risk.risk_factors() {
                writeln!(f, "  ! {}", factor)?;
            }
            for factor in risk.safety_factors() {
                writeln!(f, "  + {}", factor)?;
            }
        }

        Ok(())
    }
}
