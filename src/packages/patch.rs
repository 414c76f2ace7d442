//! Idempotent text edits for build descriptors and source files
//!
//! Both edits are pure `content -> content` functions. Applying one to its
//! own output reports [`PatchOutcome::Unchanged`], which is what makes
//! re-running an install safe.

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The edit is already in place
    Unchanged,
    Changed(String),
}

/// The anchor or pattern did not occur in the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

/// How a substitution pattern is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Literal,
    Regex,
}

/// Insert `insertion` as new line(s) after the line containing `anchor`.
///
/// The first occurrence of `anchor` wins. Line endings of the insertion
/// follow the file (CRLF files stay CRLF). Nothing is inserted if the
/// insertion text is already present anywhere in the content.
pub fn insert_after_anchor(
    content: &str,
    anchor: &str,
    insertion: &str,
) -> Result<PatchOutcome, NotFound> {
    let eol = line_ending(content);
    let body = with_line_ending(insertion.trim_end_matches(['\r', '\n']), eol);
    let anchor = with_line_ending(anchor, eol);

    if content.contains(&body) {
        return Ok(PatchOutcome::Unchanged);
    }

    let start = content.find(&anchor).ok_or(NotFound)?;
    let anchor_end = start + anchor.len();

    // A newline-terminated anchor already ends at a line boundary
    let line_end = if anchor.ends_with('\n') {
        Some(anchor_end)
    } else {
        content[anchor_end..]
            .find('\n')
            .map(|offset| anchor_end + offset + 1)
    };

    let mut patched = String::with_capacity(content.len() + body.len() + eol.len() * 2);
    match line_end {
        Some(line_end) => {
            patched.push_str(&content[..line_end]);
            patched.push_str(&body);
            patched.push_str(eol);
            patched.push_str(&content[line_end..]);
        }
        None => {
            // Anchor sits on a last line with no terminator
            patched.push_str(content);
            patched.push_str(eol);
            patched.push_str(&body);
        }
    }
    Ok(PatchOutcome::Changed(patched))
}

/// Replace the first match of `pattern` with `replacement`.
///
/// In [`MatchMode::Regex`] the replacement may use `$1`/`${name}` groups.
/// If the (expanded) replacement already occurs in the content the edit is
/// considered applied, so a replacement that contains its own pattern is
/// not applied twice.
pub fn substitute(
    content: &str,
    pattern: &str,
    replacement: &str,
    mode: MatchMode,
) -> Result<PatchOutcome, NotFound> {
    let found = match mode {
        MatchMode::Literal => content
            .find(pattern)
            .map(|start| (start, start + pattern.len(), replacement.to_string())),
        MatchMode::Regex => {
            // Patterns are validated when the manifest is loaded
            let re = Regex::new(pattern).map_err(|_| NotFound)?;
            re.captures(content).and_then(|caps| {
                let whole = caps.get(0)?;
                let mut expanded = String::new();
                caps.expand(replacement, &mut expanded);
                Some((whole.start(), whole.end(), expanded))
            })
        }
    };

    match found {
        Some((_, _, expanded)) if content.contains(&expanded) => Ok(PatchOutcome::Unchanged),
        Some((start, end, expanded)) => {
            let mut patched = String::with_capacity(content.len() + expanded.len());
            patched.push_str(&content[..start]);
            patched.push_str(&expanded);
            patched.push_str(&content[end..]);
            Ok(PatchOutcome::Changed(patched))
        }
        None if content.contains(replacement) => Ok(PatchOutcome::Unchanged),
        None => Err(NotFound),
    }
}

fn line_ending(content: &str) -> &'static str {
    if content.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

fn with_line_ending(text: &str, eol: &str) -> String {
    let unix = text.replace("\r\n", "\n");
    if eol == "\n" {
        unix
    } else {
        unix.replace('\n', eol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MK: &str = "include $(CLEAR_VARS)\nLOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\ninclude $(BUILD_SHARED_LIBRARY)\n";
    const ANCHOR: &str = "LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)";

    fn changed(outcome: PatchOutcome) -> String {
        match outcome {
            PatchOutcome::Changed(s) => s,
            PatchOutcome::Unchanged => panic!("expected a change"),
        }
    }

    #[test]
    fn test_insert_after_anchor_line() {
        let patched = changed(insert_after_anchor(MK, ANCHOR, "LOCAL_SRC_FILES += Foo.cpp").unwrap());
        assert_eq!(
            patched,
            "include $(CLEAR_VARS)\nLOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\nLOCAL_SRC_FILES += Foo.cpp\ninclude $(BUILD_SHARED_LIBRARY)\n"
        );
    }

    #[test]
    fn test_insert_is_idempotent() {
        let once = changed(insert_after_anchor(MK, ANCHOR, "LOCAL_SRC_FILES += Foo.cpp\n").unwrap());
        assert_eq!(
            insert_after_anchor(&once, ANCHOR, "LOCAL_SRC_FILES += Foo.cpp\n").unwrap(),
            PatchOutcome::Unchanged
        );
        assert_eq!(once.matches("Foo.cpp").count(), 1);
    }

    #[test]
    fn test_insert_anchor_mid_line() {
        // The insertion goes after the whole line, not right after the anchor text
        let content = "<ItemGroup> <!-- sources -->\n</ItemGroup>\n";
        let patched = changed(
            insert_after_anchor(content, "<ItemGroup>", "  <ClCompile Include=\"Foo.cpp\" />").unwrap(),
        );
        assert_eq!(
            patched,
            "<ItemGroup> <!-- sources -->\n  <ClCompile Include=\"Foo.cpp\" />\n</ItemGroup>\n"
        );
    }

    #[test]
    fn test_insert_first_anchor_wins() {
        let content = "A\nx\nA\n";
        assert_eq!(changed(insert_after_anchor(content, "A", "B").unwrap()), "A\nB\nx\nA\n");
    }

    #[test]
    fn test_insert_anchor_on_unterminated_last_line() {
        assert_eq!(
            changed(insert_after_anchor("one\ntwo", "two", "three").unwrap()),
            "one\ntwo\nthree"
        );
    }

    #[test]
    fn test_insert_keeps_crlf() {
        let content = "<Project>\r\n<ItemGroup>\r\n</ItemGroup>\r\n";
        let patched = changed(insert_after_anchor(content, "<ItemGroup>", "a\nb").unwrap());
        assert_eq!(patched, "<Project>\r\n<ItemGroup>\r\na\r\nb\r\n</ItemGroup>\r\n");
        assert_eq!(
            insert_after_anchor(&patched, "<ItemGroup>", "a\nb").unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_insert_after_newline_terminated_anchor() {
        let content = "A := 1\nLOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\ninclude $(BUILD_SHARED_LIBRARY)\n";
        let anchor = "LOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\n";
        let patched = changed(insert_after_anchor(content, anchor, "LOCAL_SRC_FILES += Foo.cpp").unwrap());
        assert_eq!(
            patched,
            "A := 1\nLOCAL_SRC_FILES := $(LOCAL_SRC_FILES)\nLOCAL_SRC_FILES += Foo.cpp\ninclude $(BUILD_SHARED_LIBRARY)\n"
        );
        assert_eq!(
            insert_after_anchor(&patched, anchor, "LOCAL_SRC_FILES += Foo.cpp").unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_insert_after_block_anchor() {
        let content = "<ItemGroup>\r\n  <ClCompile Include=\"AppDelegate.cpp\" />\r\n</ItemGroup>\r\n<ItemGroup>\r\n</ItemGroup>\r\n";
        let block = "</ItemGroup>\n<ItemGroup>";
        let patched = changed(insert_after_anchor(content, block, "  <ClInclude Include=\"Foo.h\" />").unwrap());
        assert_eq!(
            patched,
            "<ItemGroup>\r\n  <ClCompile Include=\"AppDelegate.cpp\" />\r\n</ItemGroup>\r\n<ItemGroup>\r\n  <ClInclude Include=\"Foo.h\" />\r\n</ItemGroup>\r\n"
        );

        // Same block, newline-terminated
        let terminated = changed(
            insert_after_anchor(content, "</ItemGroup>\n<ItemGroup>\n", "  <ClInclude Include=\"Foo.h\" />").unwrap(),
        );
        assert_eq!(terminated, patched);
    }

    #[test]
    fn test_insert_missing_anchor() {
        assert_eq!(insert_after_anchor(MK, "LOCAL_CFLAGS", "x"), Err(NotFound));
    }

    #[test]
    fn test_substitute_literal() {
        let content = "// plugins\nreturn true;\n";
        let once = changed(
            substitute(content, "// plugins", "// plugins\nFoo::init();", MatchMode::Literal).unwrap(),
        );
        assert_eq!(once, "// plugins\nFoo::init();\nreturn true;\n");
        assert_eq!(
            substitute(&once, "// plugins", "// plugins\nFoo::init();", MatchMode::Literal).unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_substitute_replacement_already_present() {
        let content = "APP_ABI := armeabi-v7a arm64-v8a\n";
        assert_eq!(
            substitute(content, "APP_ABI := armeabi-v7a\n", "APP_ABI := armeabi-v7a arm64-v8a", MatchMode::Literal)
                .unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_substitute_regex_groups() {
        let content = "APP_PLATFORM := android-9\n";
        let once = changed(
            substitute(content, r"android-(\d+)", "android-19", MatchMode::Regex).unwrap(),
        );
        assert_eq!(once, "APP_PLATFORM := android-19\n");

        let grouped = changed(
            substitute("version = 3\n", r"version = (\d+)", "version = ${1}0", MatchMode::Regex).unwrap(),
        );
        assert_eq!(grouped, "version = 30\n");
    }

    #[test]
    fn test_substitute_regex_idempotent() {
        let content = "// plugins\n";
        let once = changed(
            substitute(content, r"// plugins\n", "// plugins\nFoo::init();\n", MatchMode::Regex).unwrap(),
        );
        assert_eq!(
            substitute(&once, r"// plugins\n", "// plugins\nFoo::init();\n", MatchMode::Regex).unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_substitute_not_found() {
        assert_eq!(
            substitute("nothing here", "needle", "pin", MatchMode::Literal),
            Err(NotFound)
        );
        assert_eq!(
            substitute("nothing here", r"\d+", "pin", MatchMode::Regex),
            Err(NotFound)
        );
    }
}
