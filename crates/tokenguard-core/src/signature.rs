/*!
 * Assinaturas de interface
 *
 * Forma canônica de assinaturas de função (`transfer(address,uint256)`)
 * usada tanto para interfaces exigidas quanto observadas.
 */

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::utils::keccak256;

/// Assinatura de função em forma canônica
///
/// Duas assinaturas são iguais se e somente se suas formas canônicas
/// forem strings idênticas.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InterfaceSignature {
    canonical: String,
}

impl InterfaceSignature {
    /// Canonicaliza uma assinatura textual.
    ///
    /// Remove espaços e nomes de parâmetros, e expande aliases de tipo
    /// (`uint` → `uint256`, `int` → `int256`, `byte` → `bytes1`, ...).
    pub fn parse(input: &str) -> Result<Self> {
        let malformed = || Error::MalformedSignature(input.to_string());
        let trimmed = input.trim();

        let open = trimmed.find('(').ok_or_else(malformed)?;
        if !trimmed.ends_with(')') {
            return Err(malformed());
        }

        let name = trimmed[..open].trim();
        if !is_identifier(name) {
            return Err(malformed());
        }

        let inner = &trimmed[open + 1..trimmed.len() - 1];
        let types = split_top_level(inner)
            .ok_or_else(malformed)?
            .into_iter()
            .map(|arg| canonical_type(arg).ok_or_else(malformed))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::assemble(name, &types))
    }

    /// Monta uma assinatura a partir do nome e dos tipos de argumento
    pub fn from_parts<S: AsRef<str>>(name: &str, arg_types: &[S]) -> Result<Self> {
        let name = name.trim();
        if !is_identifier(name) {
            return Err(Error::MalformedSignature(name.to_string()));
        }
        let types = arg_types
            .iter()
            .map(|t| {
                canonical_type(t.as_ref())
                    .ok_or_else(|| Error::MalformedSignature(t.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::assemble(name, &types))
    }

    fn assemble(name: &str, types: &[String]) -> Self {
        Self {
            canonical: format!("{}({})", name, types.join(",")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Nome da função, sem argumentos
    pub fn name(&self) -> &str {
        match self.canonical.find('(') {
            Some(idx) => &self.canonical[..idx],
            None => &self.canonical,
        }
    }

    /// Seletor de 4 bytes: primeiros bytes do Keccak-256 da forma canônica
    pub fn selector(&self) -> [u8; 4] {
        let hash = keccak256(self.canonical.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Separa argumentos pelas vírgulas de nível zero (fora de tuplas)
fn split_top_level(inner: &str) -> Option<Vec<&str>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }

    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&inner[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    parts.push(&inner[start..]);
    Some(parts)
}

fn canonical_type(arg: &str) -> Option<String> {
    let arg = arg.trim();
    if arg.is_empty() {
        return None;
    }

    if arg.starts_with('(') {
        let close = matching_paren(arg)?;
        let members = split_top_level(&arg[1..close])?
            .into_iter()
            .map(canonical_type)
            .collect::<Option<Vec<_>>>()?;
        let suffix = array_suffix(&arg[close + 1..])?;
        return Some(format!("({}){}", members.join(","), suffix));
    }

    let mut tokens = arg.split_whitespace();
    let head = tokens.next()?;
    let (base, head_suffix) = match head.find('[') {
        Some(idx) => (&head[..idx], &head[idx..]),
        None => (head, ""),
    };

    // Dimensões separadas por espaço ("uint256 []") pertencem ao tipo
    let mut suffix = head_suffix.to_string();
    for token in tokens {
        if token.starts_with('[') {
            suffix.push_str(token);
        } else {
            break;
        }
    }

    if base.is_empty() || !base.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let suffix = array_suffix(&suffix)?;

    Some(format!("{}{}", normalize_elementary(&base.to_ascii_lowercase()), suffix))
}

fn matching_paren(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (idx, c) in s.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

/// Valida sufixos de array (`[]`, `[3][]`), descartando o que vier depois (nomes)
fn array_suffix(rest: &str) -> Option<String> {
    let compact: String = rest.split_whitespace().collect::<Vec<_>>().join(" ");
    let dims = match compact.find(|c: char| c != '[' && c != ']' && !c.is_ascii_digit()) {
        Some(idx) => compact[..idx].trim_end(),
        None => compact.as_str(),
    };

    let mut open = false;
    for c in dims.chars() {
        match c {
            '[' if !open => open = true,
            ']' if open => open = false,
            d if d.is_ascii_digit() && open => {}
            _ => return None,
        }
    }
    if open {
        return None;
    }
    Some(dims.to_string())
}

fn normalize_elementary(base: &str) -> String {
    match base {
        "uint" => "uint256".to_string(),
        "int" => "int256".to_string(),
        "byte" => "bytes1".to_string(),
        "fixed" => "fixed128x18".to_string(),
        "ufixed" => "ufixed128x18".to_string(),
        other => other.to_string(),
    }
}

impl FromStr for InterfaceSignature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for InterfaceSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl Serialize for InterfaceSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.canonical)
    }
}

impl<'de> Deserialize<'de> for InterfaceSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
