use thiserror::Error;

/// Erros comuns da biblioteca TokenGuard
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Valor numérico que não é um inteiro não-negativo na base informada
    #[error("Valor malformado: {0}")]
    MalformedAmount(String),

    /// Endereço que não é um identificador hexadecimal de 20 bytes
    #[error("Endereço malformado: {0}")]
    MalformedAddress(String),

    /// Timestamp que não é um inteiro decimal de segundos válido
    #[error("Timestamp malformado: {0}")]
    MalformedTimestamp(String),

    /// Assinatura de função que não pode ser canonicalizada
    #[error("Assinatura malformada: {0}")]
    MalformedSignature(String),

    /// Endereço desconhecido pelo serviço de dados da chain
    #[error("Endereço não encontrado: {0}")]
    AddressNotFound(String),

    /// Endereço sem código implantado
    #[error("Endereço não é um contrato: {0}")]
    NotAContract(String),

    /// Serviço de dados da chain indisponível ou com resposta de erro
    #[error("Gateway indisponível: {0}")]
    GatewayUnavailable(String),

    /// Componente chamado sem um dado obrigatório
    #[error("Entrada incompleta: {0}")]
    IncompleteInput(String),

    /// Erro de decodificação de dados
    #[error("Erro de decodificação: {0}")]
    DecodeError(String),

    /// Erro de validação de configuração
    #[error("Erro de validação: {0}")]
    ValidationError(String),
}

impl Error {
    /// Indica falha na obtenção dos dados, e não no conteúdo analisado.
    ///
    /// A camada de apresentação usa isso para nunca exibir "nada encontrado"
    /// quando na verdade não foi possível verificar.
    pub fn is_gateway_failure(&self) -> bool {
        matches!(
            self,
            Error::AddressNotFound(_)
                | Error::NotAContract(_)
                | Error::GatewayUnavailable(_)
                | Error::DecodeError(_)
        )
    }
}

/// Tipo de resultado usado em toda a biblioteca
pub type Result<T> = std::result::Result<T, Error>;
