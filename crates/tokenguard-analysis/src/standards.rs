//! Catálogos de interfaces padrão, fornecidos como dados para o verificador
//! de conformidade.

use serde::{Deserialize, Serialize};
use tokenguard_core::InterfaceSignature;

const ERC20: &[&str] = &[
    "totalSupply()",
    "balanceOf(address)",
    "transfer(address,uint256)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "allowance(address,address)",
];

const ERC721: &[&str] = &[
    "balanceOf(address)",
    "ownerOf(uint256)",
    "safeTransferFrom(address,address,uint256,bytes)",
    "safeTransferFrom(address,address,uint256)",
    "transferFrom(address,address,uint256)",
    "approve(address,uint256)",
    "setApprovalForAll(address,bool)",
    "getApproved(uint256)",
    "isApprovedForAll(address,address)",
];

/// Padrão de interface conhecido
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceStandard {
    #[default]
    Erc20,
    Erc721,
}

impl InterfaceStandard {
    pub fn signatures(&self) -> Vec<InterfaceSignature> {
        match self {
            InterfaceStandard::Erc20 => erc20(),
            InterfaceStandard::Erc721 => erc721(),
        }
    }
}

fn catalogue(entries: &[&str]) -> Vec<InterfaceSignature> {
    entries
        .iter()
        .filter_map(|entry| InterfaceSignature::parse(entry).ok())
        .collect()
}

/// Métodos obrigatórios de um token ERC-20
pub fn erc20() -> Vec<InterfaceSignature> {
    catalogue(ERC20)
}

/// Métodos obrigatórios de um token ERC-721
pub fn erc721() -> Vec<InterfaceSignature> {
    catalogue(ERC721)
}
