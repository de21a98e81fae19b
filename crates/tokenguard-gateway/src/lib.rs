/*!
 * TokenGuard Gateway
 *
 * Cliente para block explorers no formato da API do Etherscan
 */

mod abi;

pub use abi::signatures_from_abi;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokenguard_core::{
    normalize_amount, traits::ChainDataGateway, Address, BalanceRecord, ContractInterface, Error,
    NumericBase, RawTransaction, Result, NATIVE_DECIMALS,
};
use tracing::{debug, warn};

const NO_TRANSACTIONS: &str = "No transactions found";
const NOT_VERIFIED: &str = "not verified";

/// Configuração do cliente do explorer
#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Rede alvo em explorers multi-chain
    pub chain_id: Option<u64>,
    pub timeout: Duration,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.etherscan.io/api".to_string(),
            api_key: None,
            chain_id: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Envelope comum das respostas do explorer
#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    status: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
    error: Option<ProxyError>,
}

/// Erro no formato JSON-RPC, devolvido pelos endpoints `proxy`
#[derive(Debug, Deserialize)]
struct ProxyError {
    message: String,
}

impl ExplorerResponse {
    fn result_text(&self) -> String {
        match &self.result {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn into_result(self, address: &Address) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(Error::GatewayUnavailable(error.message));
        }
        match self.status.as_deref() {
            Some("1") | None => Ok(self.result),
            _ => {
                let detail = self.result_text();
                if detail.to_lowercase().contains("invalid address") {
                    Err(Error::AddressNotFound(address.to_string()))
                } else {
                    Err(Error::GatewayUnavailable(format!("{}: {}", self.message, detail)))
                }
            }
        }
    }
}

/// Cliente HTTP para o explorer
pub struct ExplorerClient {
    config: ExplorerConfig,
    client: Client,
}

impl ExplorerClient {
    /// Cria um novo cliente
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::GatewayUnavailable(format!("Falha ao criar cliente HTTP: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    async fn request(&self, params: &[(&str, String)]) -> Result<ExplorerResponse> {
        let mut query: Vec<(&str, String)> = params.to_vec();
        if let Some(key) = &self.config.api_key {
            query.push(("apikey", key.clone()));
        }
        if let Some(chain_id) = self.config.chain_id {
            query.push(("chainid", chain_id.to_string()));
        }

        debug!(endpoint = %self.config.endpoint, ?params, "consultando explorer");

        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&query)
            .send()
            .await
            .map_err(|e| Error::GatewayUnavailable(format!("Falha na requisição: {}", e)))?
            .error_for_status()
            .map_err(|e| Error::GatewayUnavailable(format!("Resposta de erro do explorer: {}", e)))?;

        response
            .json::<ExplorerResponse>()
            .await
            .map_err(|e| Error::DecodeError(format!("Falha ao decodificar resposta: {}", e)))
    }

    /// Obtém o saldo de um endereço em wei
    pub async fn get_balance(&self, address: &Address) -> Result<BalanceRecord> {
        let response = self
            .request(&[
                ("module", "account".to_string()),
                ("action", "balance".to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;

        let value_wei = match response.into_result(address)? {
            Value::String(s) => s,
            other => return Err(Error::DecodeError(format!("Saldo inesperado: {}", other))),
        };

        // Garante que o saldo é um inteiro decimal válido antes de repassar
        normalize_amount(&value_wei, NumericBase::Decimal, NATIVE_DECIMALS)
            .map_err(|e| Error::DecodeError(format!("Saldo inválido: {}", e)))?;

        Ok(BalanceRecord { value_wei })
    }

    /// Obtém a lista de transações normais de um endereço
    pub async fn get_transactions(&self, address: &Address) -> Result<Vec<RawTransaction>> {
        let response = self
            .request(&[
                ("module", "account".to_string()),
                ("action", "txlist".to_string()),
                ("address", address.to_string()),
                ("startblock", "0".to_string()),
                ("endblock", "99999999".to_string()),
                ("sort", "asc".to_string()),
            ])
            .await?;

        // Lista vazia é sucesso; qualquer outro status "0" é falha
        if response.status.as_deref() == Some("0") && response.message == NO_TRANSACTIONS {
            debug!(%address, "nenhuma transação encontrada");
            return Ok(Vec::new());
        }

        let result = response.into_result(address)?;
        let transactions: Vec<RawTransaction> = serde_json::from_value(result)
            .map_err(|e| Error::DecodeError(format!("Falha ao decodificar transações: {}", e)))?;

        debug!(%address, count = transactions.len(), "transações obtidas");
        Ok(transactions)
    }

    /// Obtém o bytecode implantado em um endereço
    pub async fn get_code(&self, address: &Address) -> Result<String> {
        let response = self
            .request(&[
                ("module", "proxy".to_string()),
                ("action", "eth_getCode".to_string()),
                ("address", address.to_string()),
                ("tag", "latest".to_string()),
            ])
            .await?;

        match response.into_result(address)? {
            Value::String(code) => Ok(code),
            other => Err(Error::DecodeError(format!("Código inesperado: {}", other))),
        }
    }

    /// Obtém a interface declarada de um contrato
    pub async fn get_contract_interface(&self, address: &Address) -> Result<ContractInterface> {
        let code = self.get_code(address).await?;
        let code = code.trim();
        if code.is_empty() || code == "0x" || code == "0x0" {
            return Err(Error::NotAContract(address.to_string()));
        }

        let response = self
            .request(&[
                ("module", "contract".to_string()),
                ("action", "getabi".to_string()),
                ("address", address.to_string()),
            ])
            .await?;

        if response.status.as_deref() == Some("0")
            && response.result_text().to_lowercase().contains(NOT_VERIFIED)
        {
            warn!(%address, "código-fonte do contrato não verificado");
            return Ok(ContractInterface {
                signatures: Vec::new(),
                verified: false,
            });
        }

        let abi = match response.into_result(address)? {
            Value::String(abi) => abi,
            other => return Err(Error::DecodeError(format!("ABI inesperado: {}", other))),
        };

        Ok(ContractInterface {
            signatures: signatures_from_abi(&abi)?,
            verified: true,
        })
    }
}

/// Implementação da trait ChainDataGateway do tokenguard-core
#[async_trait]
impl ChainDataGateway for ExplorerClient {
    async fn get_balance(&self, address: &Address) -> Result<BalanceRecord> {
        self.get_balance(address).await
    }

    async fn get_transactions(&self, address: &Address) -> Result<Vec<RawTransaction>> {
        self.get_transactions(address).await
    }

    async fn get_contract_interface(&self, address: &Address) -> Result<ContractInterface> {
        self.get_contract_interface(address).await
    }
}
