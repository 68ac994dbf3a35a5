//! Tokenizer loading with a fixed token budget

use anyhow::{anyhow, Result};
use std::path::Path;
use tokenizers::{PaddingParams, Tokenizer, TruncationParams};

/// Inputs longer than this many tokens are cut, special tokens included.
pub const DEFAULT_MAX_TOKENS: usize = 512;

/// Loads `tokenizer.json`, enabling truncation and dropping any padding
/// baked into the file (single sequences need none).
pub fn load_tokenizer(path: &Path, max_tokens: usize) -> Result<Tokenizer> {
    let mut tokenizer = Tokenizer::from_file(path)
        .map_err(|e| anyhow!("failed to load tokenizer {}: {}", path.display(), e))?;
    configure(&mut tokenizer, max_tokens)?;
    Ok(tokenizer)
}

pub fn configure(tokenizer: &mut Tokenizer, max_tokens: usize) -> Result<()> {
    if max_tokens == 0 {
        anyhow::bail!("token budget must be > 0");
    }
    tokenizer
        .with_truncation(Some(TruncationParams {
            max_length: max_tokens,
            ..Default::default()
        }))
        .map_err(|e| anyhow!("invalid truncation settings: {}", e))?;
    tokenizer.with_padding(None::<PaddingParams>);
    Ok(())
}

/// Token ids and attention mask for one text
pub struct EncodedText {
    pub ids: Vec<u32>,
    pub attention_mask: Vec<u32>,
}

pub fn encode(tokenizer: &Tokenizer, text: &str) -> Result<EncodedText> {
    let encoding = tokenizer
        .encode(text, true)
        .map_err(|e| anyhow!("tokenization failed: {}", e))?;
    if !encoding.get_overflowing().is_empty() {
        tracing::debug!("input truncated to {} tokens", encoding.get_ids().len());
    }
    Ok(EncodedText {
        ids: encoding.get_ids().to_vec(),
        attention_mask: encoding.get_attention_mask().to_vec(),
    })
}

/// Five-word vocabulary ("i love quiet evenings"), whitespace split
#[cfg(test)]
pub(crate) const WORD_LEVEL_TOKENIZER: &str = r#"{
    "version": "1.0",
    "truncation": null,
    "padding": null,
    "added_tokens": [],
    "normalizer": null,
    "pre_tokenizer": { "type": "Whitespace" },
    "post_processor": null,
    "decoder": null,
    "model": {
        "type": "WordLevel",
        "vocab": { "[UNK]": 0, "i": 1, "love": 2, "quiet": 3, "evenings": 4 },
        "unk_token": "[UNK]"
    }
}"#;
