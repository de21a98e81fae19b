use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokenguard_analysis::{RiskLevel, TransactionCoverage};
use tokenguard_core::{
    traits::ChainDataGateway, Address, BalanceRecord, ContractInterface, Error, FixedPointAmount,
    InterfaceSignature, RawTransaction, Result, RiskSignal, NATIVE_DECIMALS,
};
use tokenguard_sdk::{InvestigationRequest, Investigator, InvestigatorConfig};

const SUBJECT: &str = "0xc46eb37677360efdc011f4097621f15b792fa630";
const COUNTERPARTY: &str = "0x3333333333333333333333333333333333333333";
const TOKEN: &str = "0x4444444444444444444444444444444444444444";

#[derive(Default)]
struct InMemoryGateway {
    balance: String,
    transactions: Vec<RawTransaction>,
    interfaces: HashMap<Address, ContractInterface>,
    fail_transactions: bool,
}

#[async_trait]
impl ChainDataGateway for InMemoryGateway {
    async fn get_balance(&self, _address: &Address) -> Result<BalanceRecord> {
        Ok(BalanceRecord {
            value_wei: self.balance.clone(),
        })
    }

    async fn get_transactions(&self, _address: &Address) -> Result<Vec<RawTransaction>> {
        if self.fail_transactions {
            return Err(Error::GatewayUnavailable("rate limit".to_string()));
        }
        Ok(self.transactions.clone())
    }

    async fn get_contract_interface(&self, address: &Address) -> Result<ContractInterface> {
        self.interfaces
            .get(address)
            .cloned()
            .ok_or_else(|| Error::NotAContract(address.to_string()))
    }
}

fn eth(units: &str) -> FixedPointAmount {
    FixedPointAmount::parse_units(units, NATIVE_DECIMALS).unwrap()
}

fn tx(from: &str, to: &str, value: &str, ts: u64) -> RawTransaction {
    RawTransaction {
        hash: format!("0x{:064x}", ts),
        from: from.to_string(),
        to: to.to_string(),
        value: eth(value).raw().to_string(),
        timestamp: ts.to_string(),
        is_error: false,
        block_number: Some("0x112a880".to_string()),
        gas_price: Some("30000000000".to_string()),
    }
}

fn sigs(list: &[&str]) -> Vec<InterfaceSignature> {
    list.iter().map(|s| InterfaceSignature::parse(s).unwrap()).collect()
}

fn gateway() -> InMemoryGateway {
    InMemoryGateway {
        balance: eth("2.5").raw().to_string(),
        transactions: vec![
            tx(COUNTERPARTY, SUBJECT, "5", 1_700_000_000),
            tx(SUBJECT, COUNTERPARTY, "12", 1_700_000_100),
            tx(COUNTERPARTY, SUBJECT, "37", 1_700_000_200),
        ],
        ..Default::default()
    }
}

fn subject() -> Address {
    SUBJECT.parse().unwrap()
}

#[tokio::test]
async fn full_pipeline_produces_report() {
    let mut gateway = gateway();
    gateway.interfaces.insert(
        TOKEN.parse().unwrap(),
        ContractInterface {
            signatures: sigs(&["balanceOf(address)", "totalSupply()"]),
            verified: true,
        },
    );

    let config = InvestigatorConfig::builder()
        .native_price(Decimal::new(2000, 0))
        .currency("USD")
        .build()
        .unwrap();
    let investigator = Investigator::new(Arc::new(gateway), config).unwrap();

    let request = InvestigationRequest::new(subject())
        .with_contract(TOKEN.parse().unwrap())
        .with_url("http://free-airdrop.xyz/claim");
    let report = investigator.investigate(&request).await.unwrap();

    let large: Vec<FixedPointAmount> = report.large_transfers().map(|t| t.amount).collect();
    assert_eq!(large, vec![eth("37"), eth("12")]);
    assert_eq!(
        report.coverage(),
        TransactionCoverage::Examined {
            fetched: 3,
            involving_subject: 3
        }
    );
    assert_eq!(report.flagged_transactions()[0].block_number, Some(18_000_000));

    let compliance = report.compliance().unwrap();
    assert!(!compliance.fully_compliant());
    assert!(compliance
        .missing()
        .contains(&InterfaceSignature::parse("transfer(address,uint256)").unwrap()));

    let risk = report.risk().unwrap();
    assert_eq!(risk.level(), RiskLevel::High);
    assert!(risk.safety_factors().iter().any(|f| f.contains("Verified")));

    assert_eq!(report.balance(), Some(&eth("2.5")));
    assert_eq!(report.balance_display().unwrap().value, Decimal::new(5000, 0));
}

#[tokio::test]
async fn gateway_failure_is_not_reported_as_empty() {
    let mut gateway = gateway();
    gateway.fail_transactions = true;
    let investigator = Investigator::new(Arc::new(gateway), InvestigatorConfig::default()).unwrap();

    let err = investigator
        .investigate(&InvestigationRequest::new(subject()))
        .await
        .unwrap_err();
    assert!(err.is_gateway_failure());
}

#[tokio::test]
async fn empty_history_yields_no_data_marker() {
    let gateway = InMemoryGateway {
        balance: "0".to_string(),
        ..Default::default()
    };
    let investigator = Investigator::new(Arc::new(gateway), InvestigatorConfig::default()).unwrap();

    let report = investigator
        .investigate(&InvestigationRequest::new(subject()))
        .await
        .unwrap();
    assert!(report.no_data_examined());
    assert!(report.risk().is_none());
    assert!(report.to_string().contains("NO DATA EXAMINED"));
}

#[tokio::test]
async fn unverified_contract_is_neutral() {
    let mut gateway = gateway();
    gateway.interfaces.insert(
        TOKEN.parse().unwrap(),
        ContractInterface {
            signatures: Vec::new(),
            verified: false,
        },
    );
    let investigator = Investigator::new(Arc::new(gateway), InvestigatorConfig::default()).unwrap();

    let request = InvestigationRequest::new(subject()).with_contract(TOKEN.parse().unwrap());
    let report = investigator.investigate(&request).await.unwrap();

    assert!(report.compliance().is_none());
    let risk = report.risk().unwrap();
    assert_eq!(risk.level(), RiskLevel::Low);
    assert!(risk.risk_factors().is_empty());
    assert!(risk.safety_factors().is_empty());
}

#[tokio::test]
async fn missing_contract_code_propagates() {
    let investigator = Investigator::new(Arc::new(gateway()), InvestigatorConfig::default()).unwrap();

    let request = InvestigationRequest::new(subject()).with_contract(TOKEN.parse().unwrap());
    let err = investigator.investigate(&request).await.unwrap_err();
    assert!(matches!(err, Error::NotAContract(_)));
}

#[tokio::test]
async fn caller_signals_reach_the_scorer() {
    let investigator = Investigator::new(Arc::new(gateway()), InvestigatorConfig::default()).unwrap();

    let request = InvestigationRequest::new(subject())
        .with_signal(RiskSignal::LiquidityLocked(false))
        .with_signal(RiskSignal::HolderCount(12));
    let report = investigator.investigate(&request).await.unwrap();

    let risk = report.risk().unwrap();
    assert_eq!(risk.level(), RiskLevel::High);
    assert_eq!(risk.risk_factors().len(), 2);
}

#[tokio::test]
async fn works_through_a_trait_object() {
    let gateway: Arc<dyn ChainDataGateway> = Arc::new(gateway());
    let investigator = Investigator::new(gateway, InvestigatorConfig::default()).unwrap();

    let report = investigator
        .investigate(&InvestigationRequest::new(subject()))
        .await
        .unwrap();
    assert_eq!(report.large_transfers().count(), 2);
}
