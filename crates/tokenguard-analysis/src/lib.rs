/*!
 * TokenGuard Analysis
 *
 * Análise heurística de endereços e tokens: classificação de transações
 * em relação a um endereço, conformidade de interfaces de contrato e
 * pontuação de risco explicável. Todas as operações são puras e síncronas
 * sobre dados já materializados em memória.
 */

pub mod classifier;
pub mod compliance;
pub mod config;
pub mod report;
pub mod risk;
pub mod standards;

// Re-exportações públicas
pub use classifier::*;
pub use compliance::*;
pub use config::*;
pub use report::*;
pub use risk::*;
