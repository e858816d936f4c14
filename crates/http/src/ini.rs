//! Permissive INI parsing for `conaninfo.txt`, per SPEC_FULL §6:
//! `[section]` headers, `key=value` lines, a bare `key` with no `=`
//! yields the empty string, comments and blank lines are ignored.
//!
//! Section order and key order are preserved (`Vec` of pairs rather
//! than a `HashMap`) since the search endpoint's `recipe_hash` handling
//! needs "the first key of the section", not an arbitrary one.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    pub sections: Vec<(String, Vec<(String, String)>)>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<(String, Vec<(String, String)>)> = Vec::new();
        let mut current: Option<String> = None;

        for raw_line in text.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') && line.len() >= 2 {
                let name = line[1..line.len() - 1].trim().to_string();
                sections.push((name.clone(), Vec::new()));
                current = Some(name);
                continue;
            }
            let Some(ref section_name) = current else {
                continue;
            };
            let (key, value) = match line.split_once('=') {
                Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
                None => (line.to_string(), String::new()),
            };
            if let Some((_, entries)) = sections.iter_mut().find(|(n, _)| n == section_name) {
                entries.push((key, value));
            }
        }

        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&[(String, String)]> {
        self.sections.iter().find(|(n, _)| n == name).map(|(_, e)| e.as_slice())
    }

    /// The first key of `name`'s section, ignoring its value — used for
    /// the `recipe_hash` section, which Conan stores as a bare key.
    pub fn first_key(&self, name: &str) -> Option<&str> {
        self.section(name)?.first().map(|(k, _)| k.as_str())
    }
}
