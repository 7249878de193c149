//! M3U8 document assembly

use std::fmt::Write;

/// One playlist line pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub group_title: String,
    pub display_name: String,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(
        group_title: impl Into<String>,
        display_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            group_title: group_title.into(),
            display_name: display_name.into(),
            url: url.into(),
        }
    }
}

/// Ordered playlist entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistDocument {
    entries: Vec<PlaylistEntry>,
}

impl PlaylistDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: PlaylistEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the document. A document without entries is not a playlist
    /// and renders as `None`.
    pub fn render(&self) -> Option<String> {
        if self.entries.is_empty() {
            return None;
        }

        let mut output = String::from("#EXTM3U\n");
        for entry in &self.entries {
            // Writing into a String cannot fail.
            let _ = writeln!(
                output,
                "#EXTINF:-1 group-title=\"{}\", {}",
                entry.group_title, entry.display_name
            );
            output.push_str(&entry.url);
            output.push('\n');
        }

        Some(output.trim_end().to_string())
    }
}

impl FromIterator<PlaylistEntry> for PlaylistDocument {
    fn from_iter<I: IntoIterator<Item = PlaylistEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
