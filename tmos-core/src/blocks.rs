//! Brace-aware helpers for slicing TMOS object bodies.
//!
//! TMOS bodies nest `name { ... }` blocks to arbitrary depth and may collapse
//! a whole list onto one line (`profiles { /Common/tcp { } }`). These helpers
//! work on brace depth instead of indentation so both shapes read the same.

/// One `name { body }` or bare `name` entry at the top level of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEntry<'a> {
    /// First token of the entry.
    pub name: &'a str,
    /// Text between the entry's braces, empty for bare entries.
    pub body: &'a str,
}

/// Return the text enclosed by the brace that ends just before `open_end`.
///
/// `open_end` is the byte offset immediately after an opening `{`.
pub fn block_body(text: &str, open_end: usize) -> Option<&str> {
    let open = open_end.checked_sub(1)?;
    let close = matching_close(text.as_bytes(), open)?;
    Some(&text[open_end..close])
}

/// Split a block's contents into its top-level entries.
pub fn block_entries(text: &str) -> Vec<BlockEntry<'_>> {
    let bytes = text.as_bytes();
    let mut entries = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() || b == b'}' {
            i += 1;
            continue;
        }
        if b == b'{' {
            // anonymous block
            i = matching_close(bytes, i).map_or(bytes.len(), |close| close + 1);
            continue;
        }

        let start = i;
        while i < bytes.len() && !is_delimiter(bytes[i]) {
            i += 1;
        }
        let name = &text[start..i];

        let mut j = i;
        while j < bytes.len() && (bytes[j] == b' ' || bytes[j] == b'\t') {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'{' {
            match matching_close(bytes, j) {
                Some(close) => {
                    entries.push(BlockEntry {
                        name,
                        body: &text[j + 1..close],
                    });
                    i = close + 1;
                }
                None => {
                    entries.push(BlockEntry {
                        name,
                        body: &text[j + 1..],
                    });
                    i = bytes.len();
                }
            }
        } else {
            entries.push(BlockEntry { name, body: "" });
        }
    }

    entries
}

/// Names of the top-level entries of a block.
pub fn list_names(text: &str) -> Vec<&str> {
    block_entries(text)
        .into_iter()
        .map(|entry| entry.name)
        .collect()
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'{' || b == b'}'
}

fn matching_close(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (offset, b) in bytes[open..].iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::{block_body, block_entries, list_names, BlockEntry};

    #[test]
    fn multi_line_profile_list_yields_names() {
        let text = "\n        /Common/clientssl {\n            context clientside\n        }\n        /Common/http { }\n        /Common/tcp { }\n";
        assert_eq!(
            list_names(text),
            vec!["/Common/clientssl", "/Common/http", "/Common/tcp"]
        );
    }

    #[test]
    fn collapsed_list_matches_multi_line_list() {
        assert_eq!(
            list_names(" /Common/http { } /Common/tcp { context all } "),
            vec!["/Common/http", "/Common/tcp"]
        );
    }

    #[test]
    fn bare_entries_have_empty_body() {
        let entries = block_entries("\n        /Common/r1\n        /Common/r2\n");
        assert_eq!(
            entries,
            vec![
                BlockEntry {
                    name: "/Common/r1",
                    body: ""
                },
                BlockEntry {
                    name: "/Common/r2",
                    body: ""
                },
            ]
        );
    }

    #[test]
    fn nested_bodies_stay_with_their_entry() {
        let text = "\n  /Common/n1:80 {\n    fqdn {\n      name a.example.com\n    }\n  }\n  /Common/n2:80 {\n    address 10.0.0.2\n  }\n";
        let entries = block_entries(text);
        assert_eq!(entries.len(), 2);
        assert!(entries[0].body.contains("fqdn {"));
        assert!(entries[1].body.contains("address 10.0.0.2"));
    }

    #[test]
    fn block_body_returns_inner_text() {
        let text = "persist { /Common/cookie { default yes } } pool x";
        let open_end = text.find('{').expect("brace") + 1;
        assert_eq!(
            block_body(text, open_end),
            Some(" /Common/cookie { default yes } ")
        );
    }

    #[test]
    fn unbalanced_block_has_no_body() {
        assert_eq!(block_body("rules { /Common/r1", 7), None);
    }
}
