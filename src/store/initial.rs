//! 起動時の言語決定

use crate::config::I18nSettings;
use crate::dictionary::DictionaryTable;
use crate::types::{
    LanguageCode,
    normalize_language_code,
    primary_subtag,
};

/// 起動時の言語を決定する
///
/// 優先順位:
/// 1. `preferred`（保存された設定など）
/// 2. `hints`（`honor_locale_hints` が有効な場合のみ）
/// 3. `fallback_language`
/// 4. 辞書テーブルの最初の言語
///
/// 辞書テーブルが空の場合は `None`。
#[must_use]
pub fn resolve_initial_language(
    table: &DictionaryTable,
    preferred: Option<&str>,
    hints: &[String],
    settings: &I18nSettings,
) -> Option<LanguageCode> {
    if let Some(code) = preferred.and_then(|p| match_language(table, p)) {
        tracing::debug!(language = %code, "Using stored language preference");
        return Some(code);
    }

    if settings.honor_locale_hints
        && let Some(code) = hints.iter().find_map(|hint| match_language(table, hint))
    {
        tracing::debug!(language = %code, "Using locale hint");
        return Some(code);
    }

    if let Some(code) = match_language(table, &settings.fallback_language) {
        return Some(code);
    }

    let first = table.first_language().cloned();
    if let Some(code) = &first {
        tracing::warn!(
            fallback = %settings.fallback_language,
            language = %code,
            "Fallback language is not available, using the first language"
        );
    }
    first
}

/// 候補に一致する言語コードを辞書テーブルから探す
///
/// 完全一致 → 正規化一致（大文字小文字・`-`/`_` を無視）→ プライマリサブタグ一致 の順。
#[must_use]
pub fn match_language(table: &DictionaryTable, candidate: &str) -> Option<LanguageCode> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }

    if table.contains(candidate) {
        return Some(LanguageCode::from(candidate));
    }

    let normalized = normalize_language_code(candidate);
    if let Some(info) = table.languages().find(|info| info.code.normalized() == normalized) {
        return Some(info.code.clone());
    }

    let primary = normalize_language_code(primary_subtag(candidate));
    table.languages().find(|info| info.code.normalized() == primary).map(|info| info.code.clone())
}

/// `Accept-Language` ヘッダーを品質値の降順に並べた言語タグに変換する
///
/// `*` と `q=0` のタグは除外する。同じ品質値ならヘッダー内の順序を保つ。
#[must_use]
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut tags: Vec<(String, u16)> = header
        .split(',')
        .filter_map(|part| {
            let mut pieces = part.split(';');
            let tag = pieces.next()?.trim();
            if tag.is_empty() || tag == "*" {
                return None;
            }
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .map_or(Some(1000), parse_quality)?;
            (quality > 0).then(|| (tag.to_string(), quality))
        })
        .collect();

    // sort_by は安定ソート
    tags.sort_by(|a, b| b.1.cmp(&a.1));
    tags.into_iter().map(|(tag, _)| tag).collect()
}

/// `0.8` → `800`。不正な値は `None`。
fn parse_quality(value: &str) -> Option<u16> {
    let value = value.trim();
    let (int_part, frac_part) = value.split_once('.').unwrap_or((value, ""));
    if frac_part.len() > 3 || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let frac: u16 = format!("{frac_part:0<3}").parse().ok()?;
    match int_part {
        "0" => Some(frac),
        "1" if frac == 0 => Some(1000),
        _ => None,
    }
}
