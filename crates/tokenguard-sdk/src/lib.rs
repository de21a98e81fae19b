/*!
 * TokenGuard SDK
 *
 * Pipeline de investigação: busca concorrente no gateway, análise e relatório
 */

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokenguard_analysis::{
    build_report, check_compliance, AnalysisConfig, AnalysisReport, ComplianceResult, RiskScorer,
    TransactionClassifier,
};
use tokenguard_core::{
    normalize_amount, to_display_currency, traits::ChainDataGateway, Address, Error,
    InterfaceSignature, NumericBase, Result, RiskSignal, NATIVE_DECIMALS,
};
use tracing::{debug, info, warn};

pub use tokenguard_gateway::{ExplorerClient, ExplorerConfig};

/// Configuração do investigador
#[derive(Debug, Clone)]
pub struct InvestigatorConfig {
    pub analysis: AnalysisConfig,
    /// Preço de uma unidade nativa na moeda de exibição
    pub native_price: Option<Decimal>,
    pub currency: String,
}

impl InvestigatorConfig {
    /// Cria um builder para a configuração
    pub fn builder() -> InvestigatorConfigBuilder {
        InvestigatorConfigBuilder::default()
    }
}

impl Default for InvestigatorConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            native_price: None,
            currency: "USD".to_string(),
        }
    }
}

/// Builder para configuração do investigador
#[derive(Debug, Default)]
pub struct InvestigatorConfigBuilder {
    analysis: Option<AnalysisConfig>,
    native_price: Option<Decimal>,
    currency: Option<String>,
}

impl InvestigatorConfigBuilder {
    /// Define a configuração de análise
    pub fn analysis(mut self, analysis: AnalysisConfig) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Carrega a configuração de análise de um documento JSON
    pub fn analysis_json(mut self, json: &str) -> Result<Self> {
        self.analysis = Some(AnalysisConfig::from_json(json)?);
        Ok(self)
    }

    /// Define o preço da unidade nativa usado na estimativa do saldo
    pub fn native_price(mut self, price: Decimal) -> Self {
        self.native_price = Some(price);
        self
    }

    /// Define a moeda de exibição
    pub fn currency<S: Into<String>>(mut self, currency: S) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Constrói a configuração
    pub fn build(self) -> Result<InvestigatorConfig> {
        let analysis = self.analysis.unwrap_or_default();
        analysis.validate()?;

        if let Some(price) = self.native_price {
            if price.is_sign_negative() {
                return Err(Error::ValidationError(
                    "native_price não pode ser negativo".to_string(),
                ));
            }
        }

        let currency = match self.currency {
            Some(currency) if currency.trim().is_empty() => {
                return Err(Error::ValidationError("currency não pode ser vazia".to_string()));
            }
            Some(currency) => currency,
            None if self.native_price.is_some() => {
                return Err(Error::ValidationError(
                    "currency é obrigatória quando native_price é definido".to_string(),
                ));
            }
            None => "USD".to_string(),
        };

        Ok(InvestigatorConfig {
            analysis,
            native_price: self.native_price,
            currency,
        })
    }
}

/// Pedido de investigação de um endereço
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestigationRequest {
    pub address: Address,
    /// Contrato cuja interface deve ser verificada
    #[serde(default)]
    pub contract: Option<Address>,
    /// URL ou domínio apresentado ao usuário
    #[serde(default)]
    pub url: Option<String>,
    /// Sinais obtidos pelo chamador (liquidez, holders, ...)
    #[serde(default)]
    pub signals: Vec<RiskSignal>,
}

impl InvestigationRequest {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            contract: None,
            url: None,
            signals: Vec::new(),
        }
    }

    pub fn with_contract(mut self, contract: Address) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn with_url<S: Into<String>>(mut self, url: S) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_signal(mut self, signal: RiskSignal) -> Self {
        self.signals.push(signal);
        self
    }
}

/// Investigador de endereços sobre um gateway de dados da chain
pub struct Investigator<G: ChainDataGateway + ?Sized> {
    gateway: Arc<G>,
    config: InvestigatorConfig,
    classifier: TransactionClassifier,
    scorer: RiskScorer,
    required: Vec<InterfaceSignature>,
}

impl<G: ChainDataGateway + ?Sized> Investigator<G> {
    /// Cria um novo investigador
    pub fn new(gateway: Arc<G>, config: InvestigatorConfig) -> Result<Self> {
        let classifier = TransactionClassifier::from_config(&config.analysis.classifier)?;
        let scorer = RiskScorer::new(config.analysis.scorer.clone());
        let required = config.analysis.required_signatures();

        Ok(Self {
            gateway,
            config,
            classifier,
            scorer,
            required,
        })
    }

    pub fn config(&self) -> &InvestigatorConfig {
        &self.config
    }

    /// Executa a investigação completa e devolve o relatório
    ///
    /// Saldo e transações são buscados em paralelo e ambos precisam ter
    /// sucesso: uma falha do gateway é propagada, nunca tratada como
    /// histórico vazio.
    pub async fn investigate(&self, request: &InvestigationRequest) -> Result<AnalysisReport> {
        let subject = request.address;
        info!(%subject, "iniciando investigação");

        let (balance, raw_txs) = tokio::try_join!(
            self.gateway.get_balance(&subject),
            self.gateway.get_transactions(&subject),
        )
        .map_err(|e| {
            warn!(%subject, error = %e, "falha ao consultar gateway");
            e
        })?;

        let balance = normalize_amount(&balance.value_wei, NumericBase::Decimal, NATIVE_DECIMALS)?;
        let balance_display = match self.config.native_price {
            Some(price) => Some(to_display_currency(&balance, price, &self.config.currency)?),
            None => None,
        };

        let classified = self.classifier.classify(&subject, &raw_txs)?;
        debug!(%subject, coverage = ?classified.coverage(), "transações classificadas");

        let mut signals = request.signals.clone();

        let compliance = match &request.contract {
            Some(contract) => self.inspect_contract(contract, &mut signals).await?,
            None => None,
        };

        if let Some(url) = &request.url {
            signals.extend(self.scorer.signals_from_url(url));
        }

        // Sem nenhum sinal não há o que pontuar
        let risk = if signals.is_empty() {
            None
        } else {
            Some(self.scorer.score(&signals))
        };

        if let Some(verdict) = &risk {
            info!(%subject, level = %verdict.level(), "veredito calculado");
        }

        Ok(build_report(subject, Some(&classified), compliance, risk)
            .with_balance(balance, balance_display))
    }

    /// Verifica a interface do contrato e registra o sinal de verificação
    async fn inspect_contract(
        &self,
        contract: &Address,
        signals: &mut Vec<RiskSignal>,
    ) -> Result<Option<ComplianceResult>> {
        let interface = self.gateway.get_contract_interface(contract).await?;
        signals.push(RiskSignal::Verified(interface.verified));

        // Sem código verificado a interface observada é desconhecida, não vazia
        if !interface.verified {
            warn!(%contract, "interface não verificável");
            return Ok(None);
        }

        let observed: HashSet<InterfaceSignature> = interface.signatures.into_iter().collect();
        let result = check_compliance(&self.required, &observed)?;
        debug!(
            %contract,
            missing = result.missing().len(),
            compliant = result.fully_compliant(),
            "conformidade verificada"
        );
        Ok(Some(result))
    }
}

impl Investigator<ExplorerClient> {
    /// Cria um investigador sobre o cliente HTTP do explorer
    pub fn with_explorer(explorer: ExplorerConfig, config: InvestigatorConfig) -> Result<Self> {
        Self::new(Arc::new(ExplorerClient::new(explorer)?), config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_uses_defaults() {
        let config = InvestigatorConfig::builder().build().unwrap();
        assert_eq!(config.currency, "USD");
        assert!(config.native_price.is_none());
        assert_eq!(config.analysis, AnalysisConfig::default());
    }

    #[test]
    fn builder_requires_currency_with_price() {
        let err = InvestigatorConfig::builder()
            .native_price(Decimal::new(3000, 0))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));

        let config = InvestigatorConfig::builder()
            .native_price(Decimal::new(3000, 0))
            .currency("EUR")
            .build()
            .unwrap();
        assert_eq!(config.currency, "EUR");
    }

    #[test]
    fn builder_rejects_negative_price() {
        let err = InvestigatorConfig::builder()
            .native_price(Decimal::new(-1, 0))
            .currency("USD")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::ValidationError(_)));
    }

    #[test]
    fn builder_reads_analysis_json() {
        let config = InvestigatorConfig::builder()
            .analysis_json(r#"{"classifier": {"large_threshold": "2.5"}}"#)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.analysis.classifier.large_threshold, "2.5");
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: InvestigationRequest = serde_json::from_str(
            r#"{"address": "0xc46eb37677360efdc011f4097621f15b792fa630"}"#,
        )
        .unwrap();
        assert!(request.contract.is_none());
        assert!(request.signals.is_empty());
    }
}
