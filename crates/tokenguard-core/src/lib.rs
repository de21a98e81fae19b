/*!
 * TokenGuard Core
 *
 * Tipos, normalização de valores e contratos compartilhados
 * para a workspace TokenGuard
 */

pub mod types;
pub mod signature;
pub mod traits;
pub mod utils;
pub mod error;

// Re-exportações públicas
pub use error::{Error, Result};
pub use types::*;
pub use utils::{normalize_amount, normalize_gwei, parse_quantity, parse_timestamp, to_display_currency};
