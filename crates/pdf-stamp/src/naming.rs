//! Output file naming and collision handling

use std::path::{Path, PathBuf};

/// Characters replaced with `_` in recipient names.
const REPLACED_CHARS: &[char] = &[' ', '/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a recipient name safe to embed in a file name.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| {
            if REPLACED_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// `{template}_{recipient}.pdf`
pub fn output_file_name(template_base: &str, recipient_name: &str) -> String {
    format!("{}_{}.pdf", template_base, sanitize_name(recipient_name))
}

/// Candidate paths for `file_name` in `dir`: the plain name first, then
/// `stem_1.ext`, `stem_2.ext`, and so on.
pub fn candidate_paths(dir: &Path, file_name: &str) -> impl Iterator<Item = PathBuf> {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let dir = dir.to_owned();
    let first = dir.join(file_name);

    std::iter::once(first).chain((1u32..).map(move |n| dir.join(format!("{}_{}{}", stem, n, ext))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name("contract", "Jane Q Public"),
            "contract_Jane_Q_Public.pdf"
        );
        assert_eq!(output_file_name("nda", "a/b\\c"), "nda_a_b_c.pdf");
    }

    #[test]
    fn test_candidates_count_up() {
        let names: Vec<PathBuf> = candidate_paths(Path::new("out"), "doc_Ann.pdf")
            .take(3)
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("out/doc_Ann.pdf"),
                PathBuf::from("out/doc_Ann_1.pdf"),
                PathBuf::from("out/doc_Ann_2.pdf"),
            ]
        );
    }
}
