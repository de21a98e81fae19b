/*!
 * TokenGuard Traits
 *
 * Fronteira com o serviço externo de dados da chain
 */

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{Address, BalanceRecord, ContractInterface, RawTransaction};

/// Trait para serviços de dados da chain (block explorers, nodes)
///
/// Falhas devem ser sempre propagadas como erro: uma lista vazia significa
/// "consultado, sem transações", nunca "não foi possível consultar".
#[async_trait]
pub trait ChainDataGateway: Send + Sync {
    /// Obtém o saldo nativo de um endereço, em wei
    async fn get_balance(&self, address: &Address) -> Result<BalanceRecord>;

    /// Obtém a lista de transações de um endereço
    async fn get_transactions(&self, address: &Address) -> Result<Vec<RawTransaction>>;

    /// Obtém a interface declarada de um contrato
    ///
    /// Falha com `NotAContract` se o endereço não tiver código.
    async fn get_contract_interface(&self, address: &Address) -> Result<ContractInterface>;
}
