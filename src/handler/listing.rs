//! Directory listing module
//!
//! Renders an HTML index for directories that have no index file.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::io;
use std::path::Path;
use tokio::fs;

/// Characters escaped in listing hrefs; `/` stays literal so directory links keep their slash
const HREF_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// A single row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Text shown to the user (`name/` for directories, `name@` for symlinks)
    pub display: String,
    /// Relative link target (`name/` for directories)
    pub href: String,
}

impl ListingEntry {
    fn new(name: &str, is_dir: bool, is_symlink: bool) -> Self {
        let href = if is_dir {
            format!("{name}/")
        } else {
            name.to_string()
        };
        let display = if is_symlink {
            format!("{name}@")
        } else {
            href.clone()
        };
        Self { display, href }
    }
}

/// Read a directory and return its entries sorted case-insensitively
pub async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().await?;
        // Symlinked directories still link with a trailing slash
        let is_dir = if file_type.is_symlink() {
            fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir())
        } else {
            file_type.is_dir()
        };
        entries.push(ListingEntry::new(&name, is_dir, file_type.is_symlink()));
    }

    entries.sort_by_cached_key(|e| e.display.to_lowercase());
    Ok(entries)
}

/// Render the listing page for `request_path` (raw, still percent-encoded)
pub fn render_listing(request_path: &str, entries: &[ListingEntry]) -> String {
    let shown_path = percent_decode_str(request_path)
        .decode_utf8()
        .map_or_else(|_| request_path.to_string(), |p| p.into_owned());
    let title = format!("Directory listing for {}", escape_html(&shown_path));

    let mut items = String::new();
    for entry in entries {
        items.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            utf8_percent_encode(&entry.href, HREF_ESCAPE),
            escape_html(&entry.display)
        ));
    }

    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{title}</title>\n\
         </head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <hr>\n\
         <ul>\n\
         {items}\
         </ul>\n\
         <hr>\n\
         </body>\n\
         </html>\n"
    )
}

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestDir;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&#x27;");
        assert_eq!(escape_html("plain.txt"), "plain.txt");
    }

    #[tokio::test]
    async fn test_read_entries_sorted() {
        let dir = TestDir::new("listing-sorted");
        dir.write("b.txt", b"b");
        dir.write("A.txt", b"a");
        dir.mkdir("css");

        let entries = read_entries(dir.path()).await.unwrap();
        let shown: Vec<_> = entries.iter().map(|e| e.display.as_str()).collect();
        assert_eq!(shown, vec!["A.txt", "b.txt", "css/"]);
        assert_eq!(entries[2].href, "css/");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_marked() {
        let dir = TestDir::new("listing-symlink");
        let target = dir.write("real.txt", b"x");
        std::os::unix::fs::symlink(target, dir.path().join("alias.txt")).unwrap();

        let entries = read_entries(dir.path()).await.unwrap();
        assert!(entries.iter().any(|e| e.display == "alias.txt@" && e.href == "alias.txt"));
    }

    #[test]
    fn test_render_escapes_names_and_links() {
        let entries = vec![
            ListingEntry::new("my file.html", false, false),
            ListingEntry::new("<script>", false, false),
            ListingEntry::new("sub", true, false),
        ];
        let html = render_listing("/assets%20dir/", &entries);

        assert!(html.contains("<title>Directory listing for /assets dir/</title>"));
        assert!(html.contains("<a href=\"my%20file.html\">my file.html</a>"));
        assert!(html.contains("<a href=\"%3Cscript%3E\">&lt;script&gt;</a>"));
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));
        assert!(!html.contains("<script>"));
    }
}
