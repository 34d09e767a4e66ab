//! Candidate collection and ranking.

use super::{AutocompleteOption, OptionCategory};
use crate::traits::{CommandCatalog, DirectoryProvider, EntryKind, EnvironmentProvider};
use std::sync::Arc;

/// Most options a single ranking returns.
pub const MAX_OPTIONS: usize = 10;

const PRIMARY_SCORE: f32 = 1.0;
const ALIAS_SCORE: f32 = 0.5;
const PATH_SCORE: f32 = 0.8;
const VARIABLE_SCORE: f32 = 0.9;

/// Ranks suggestions from the three providers.
#[derive(Clone)]
pub struct AutocompleteRanker {
    catalog: Arc<dyn CommandCatalog>,
    directories: Arc<dyn DirectoryProvider>,
    environment: Arc<dyn EnvironmentProvider>,
}

impl AutocompleteRanker {
    pub fn new(
        catalog: Arc<dyn CommandCatalog>,
        directories: Arc<dyn DirectoryProvider>,
        environment: Arc<dyn EnvironmentProvider>,
    ) -> Self {
        Self {
            catalog,
            directories,
            environment,
        }
    }

    /// Rank completions for `input`, resolving relative paths against `cwd`.
    ///
    /// Results are ordered by descending score; equal scores keep provider
    /// order (commands, then paths, then variables).
    pub fn rank(&self, input: &str, cwd: &str) -> Vec<AutocompleteOption> {
        if input.trim().is_empty() {
            return Vec::new();
        }

        let mut options = self.command_options(input);
        if input.contains('/') || input.contains('.') {
            options.extend(self.path_options(input, cwd));
        }
        if input.starts_with('$') {
            options.extend(self.variable_options(input));
        }

        options.sort_by(|a, b| b.score.total_cmp(&a.score));
        options.truncate(MAX_OPTIONS);
        options
    }

    fn command_options(&self, input: &str) -> Vec<AutocompleteOption> {
        self.catalog
            .commands()
            .into_iter()
            .filter_map(|spec| {
                let score = if spec.name.starts_with(input) {
                    PRIMARY_SCORE
                } else if spec.aliases.iter().any(|a| a.starts_with(input)) {
                    ALIAS_SCORE
                } else {
                    return None;
                };
                Some(AutocompleteOption {
                    value: spec.name,
                    description: spec.description,
                    category: OptionCategory::Command,
                    score,
                })
            })
            .collect()
    }

    fn path_options(&self, input: &str, cwd: &str) -> Vec<AutocompleteOption> {
        let token_start = input
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        let token = &input[token_start..];
        let (dir_part, prefix) = match token.rfind('/') {
            Some(i) => token.split_at(i + 1),
            None => ("", token),
        };

        let dir = resolve_dir(dir_part, cwd);
        let entries = match self.directories.list(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                log::debug!("Path completion skipped for {:?}: {}", dir, e);
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .filter(|entry| entry.name.starts_with(prefix))
            .map(|entry| {
                let (category, suffix, description) = match entry.kind {
                    EntryKind::Directory => {
                        (OptionCategory::Directory, "/", "directory".to_string())
                    }
                    EntryKind::File => (
                        OptionCategory::File,
                        "",
                        format!("file, {} bytes", entry.size),
                    ),
                };
                AutocompleteOption {
                    value: format!("{}{}{}{}", &input[..token_start], dir_part, entry.name, suffix),
                    description,
                    category,
                    score: PATH_SCORE,
                }
            })
            .collect()
    }

    fn variable_options(&self, input: &str) -> Vec<AutocompleteOption> {
        let prefix = input[1..].to_lowercase();
        self.environment
            .variables()
            .into_iter()
            .filter(|(name, _)| name.to_lowercase().starts_with(&prefix))
            .map(|(name, value)| AutocompleteOption {
                value: format!("${name}"),
                description: value,
                category: OptionCategory::Variable,
                score: VARIABLE_SCORE,
            })
            .collect()
    }
}

/// Directory to list for the directory part of a path token.
fn resolve_dir(dir_part: &str, cwd: &str) -> String {
    if dir_part.is_empty() {
        return cwd.to_string();
    }
    if dir_part.starts_with('/') || dir_part.starts_with('~') {
        return dir_part.to_string();
    }
    format!("{}/{}", cwd.trim_end_matches('/'), dir_part)
}
