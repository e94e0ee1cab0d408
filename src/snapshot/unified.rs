//! Unified diff generation
//!
//! Produces `diff -u` style output for two small text files: `---`/`+++`
//! headers, `@@` hunks with three lines of context, GNU range formatting.
//! Memory stays linear in the file length, so large generated files such
//! as a directory-synced `/etc/passwd` diff without trouble.

use std::sync::OnceLock;

use regex::Regex;

/// Lines of context around each change
pub const CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal,
    Delete,
    Insert,
}

/// Compute a unified diff; `None` when the texts have the same lines
pub fn unified_diff(old: &str, new: &str, old_header: &str, new_header: &str) -> Option<String> {
    let a: Vec<&str> = old.lines().collect();
    let b: Vec<&str> = new.lines().collect();
    let script = edit_script(&a, &b);
    if script.iter().all(|e| *e == Edit::Equal) {
        return None;
    }

    // Line cursors into `a` and `b` before each script position
    let mut cursors = Vec::with_capacity(script.len() + 1);
    let (mut ai, mut bi) = (0usize, 0usize);
    for edit in &script {
        cursors.push((ai, bi));
        match edit {
            Edit::Equal => {
                ai += 1;
                bi += 1;
            }
            Edit::Delete => ai += 1,
            Edit::Insert => bi += 1,
        }
    }
    cursors.push((ai, bi));

    let mut out = String::new();
    out.push_str(&format!("--- {}\n+++ {}\n", old_header, new_header));

    for (start, end) in hunks(&script, CONTEXT_LINES) {
        let (a_start, b_start) = cursors[start];
        let (a_end, b_end) = cursors[end];
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            range(a_start, a_end - a_start),
            range(b_start, b_end - b_start)
        ));
        for k in start..end {
            let (ai, bi) = cursors[k];
            match script[k] {
                Edit::Equal => {
                    out.push(' ');
                    out.push_str(a[ai]);
                }
                Edit::Delete => {
                    out.push('-');
                    out.push_str(a[ai]);
                }
                Edit::Insert => {
                    out.push('+');
                    out.push_str(b[bi]);
                }
            }
            out.push('\n');
        }
    }

    Some(out)
}

/// Longest-common-subsequence edit script, deletions before insertions
///
/// Shared leading and trailing lines are peeled off first; the rest is
/// aligned in linear space by splitting on the middle line of `a`.
fn edit_script(a: &[&str], b: &[&str]) -> Vec<Edit> {
    let prefix = a.iter().zip(b).take_while(|(x, y)| x == y).count();
    let suffix = a[prefix..]
        .iter()
        .rev()
        .zip(b[prefix..].iter().rev())
        .take_while(|(x, y)| x == y)
        .count();

    let mut script = Vec::with_capacity(a.len() + b.len());
    script.extend(std::iter::repeat(Edit::Equal).take(prefix));
    align(
        &a[prefix..a.len() - suffix],
        &b[prefix..b.len() - suffix],
        &mut script,
    );
    script.extend(std::iter::repeat(Edit::Equal).take(suffix));
    deletions_first(&mut script);
    script
}

fn align(a: &[&str], b: &[&str], out: &mut Vec<Edit>) {
    if a.is_empty() {
        out.extend(std::iter::repeat(Edit::Insert).take(b.len()));
        return;
    }
    if b.is_empty() {
        out.extend(std::iter::repeat(Edit::Delete).take(a.len()));
        return;
    }
    if a.len() == 1 {
        match b.iter().position(|line| *line == a[0]) {
            Some(j) => {
                out.extend(std::iter::repeat(Edit::Insert).take(j));
                out.push(Edit::Equal);
                out.extend(std::iter::repeat(Edit::Insert).take(b.len() - j - 1));
            }
            None => {
                out.push(Edit::Delete);
                out.extend(std::iter::repeat(Edit::Insert).take(b.len()));
            }
        }
        return;
    }

    let mid = a.len() / 2;
    let forward = lcs_lengths(&a[..mid], b, false);
    let backward = lcs_lengths(&a[mid..], b, true);
    let m = b.len();
    let split = (0..=m)
        .max_by_key(|&j| (forward[j] + backward[m - j], std::cmp::Reverse(j)))
        .unwrap_or(0);

    align(&a[..mid], &b[..split], out);
    align(&a[mid..], &b[split..], out);
}

/// Last row of the LCS table: entry `j` is the LCS length of `a` and the
/// first `j` lines of `b`, or of both suffixes when `reversed`
fn lcs_lengths(a: &[&str], b: &[&str], reversed: bool) -> Vec<usize> {
    let (n, m) = (a.len(), b.len());
    let mut prev = vec![0usize; m + 1];
    let mut cur = vec![0usize; m + 1];
    for i in 0..n {
        let x = if reversed { a[n - 1 - i] } else { a[i] };
        for j in 0..m {
            let y = if reversed { b[m - 1 - j] } else { b[j] };
            cur[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(cur[j])
            };
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev
}

/// Within each run of changes, move deletions ahead of insertions
fn deletions_first(script: &mut [Edit]) {
    for run in script.split_mut(|e| *e == Edit::Equal) {
        run.sort_by_key(|e| *e != Edit::Delete);
    }
}

/// Script ranges `[start, end)` covering each change plus context; changes
/// whose context would touch are merged into one hunk
fn hunks(script: &[Edit], context: usize) -> Vec<(usize, usize)> {
    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for (k, edit) in script.iter().enumerate() {
        if *edit == Edit::Equal {
            continue;
        }
        let start = k.saturating_sub(context);
        let end = (k + 1 + context).min(script.len());
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => hunks.push((start, end)),
        }
    }
    hunks
}

/// GNU range: `start,len`, just `start` for one line, `start-1,0` when empty
fn range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

fn escape_sequences() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // CSI, OSC (BEL or ST terminated), other two-byte escapes, stray C0 controls
        Regex::new(
            r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-_]|[\x00-\x08\x0b\x0c\x0e-\x1f\x7f]",
        )
        .expect("escape sequence pattern is valid")
    })
}

/// Remove terminal control and escape sequences so diff text is safe to print
pub fn strip_control_sequences(text: &str) -> String {
    escape_sequences().replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Lines "1".."n", with selected 1-based lines replaced
    fn numbered(n: usize, edits: &[(usize, &str)]) -> String {
        (1..=n)
            .map(|i| match edits.iter().find(|(line, _)| *line == i) {
                Some((_, text)) => format!("{}\n", text),
                None => format!("{}\n", i),
            })
            .collect()
    }

    #[test]
    fn test_identical_lines_have_no_diff() {
        assert!(unified_diff("a\nb\n", "a\nb\n", "x", "y").is_none());
        // Only the trailing newline differs
        assert!(unified_diff("a\nb\n", "a\nb", "x", "y").is_none());
    }

    #[test]
    fn test_single_line_change() {
        let old = "root:x:0:0\nbin:x:1:1\ndaemon:x:2:2\n";
        let new = "root:x:0:0\nbin:x:1:1\ndaemon:x:2:99\n";
        let diff = unified_diff(old, new, "a", "b").unwrap();
        assert_eq!(
            diff,
            "--- a\n+++ b\n@@ -1,3 +1,3 @@\n root:x:0:0\n bin:x:1:1\n-daemon:x:2:2\n+daemon:x:2:99\n"
        );
    }

    #[test]
    fn test_insert_at_end() {
        let diff = unified_diff("a\n", "a\nb\n", "old", "new").unwrap();
        assert_eq!(diff, "--- old\n+++ new\n@@ -1 +1,2 @@\n a\n+b\n");
    }

    #[test]
    fn test_insert_into_empty_file() {
        let diff = unified_diff("", "a\n", "old", "new").unwrap();
        assert_eq!(diff, "--- old\n+++ new\n@@ -0,0 +1 @@\n+a\n");
    }

    #[test]
    fn test_context_trims_far_lines() {
        let old = numbered(10, &[]);
        let new = numbered(10, &[(5, "five")]);
        let diff = unified_diff(&old, &new, "a", "b").unwrap();
        assert_eq!(
            diff,
            "--- a\n+++ b\n@@ -2,7 +2,7 @@\n 2\n 3\n 4\n-5\n+five\n 6\n 7\n 8\n"
        );
    }

    #[test]
    fn test_close_changes_share_a_hunk() {
        let old = numbered(12, &[]);
        // Six unchanged lines between the two edits
        let new = numbered(12, &[(2, "two"), (9, "nine")]);
        let diff = unified_diff(&old, &new, "a", "b").unwrap();
        assert_eq!(diff.matches("@@ -").count(), 1);
        assert!(diff.contains("@@ -1,12 +1,12 @@"));
    }

    #[test]
    fn test_distant_changes_split_hunks() {
        let old = numbered(20, &[]);
        let new = numbered(20, &[(2, "two"), (18, "eighteen")]);
        let diff = unified_diff(&old, &new, "a", "b").unwrap();
        assert_eq!(diff.matches("@@ -").count(), 2);
        assert!(diff.contains("@@ -1,5 +1,5 @@"));
        assert!(diff.contains("@@ -15,6 +15,6 @@"));
    }

    #[test]
    fn test_large_file_with_one_change() {
        let old: String = (0..20_000)
            .map(|i| format!("user{i}:x:{i}:{i}::/home/user{i}:/bin/sh\n"))
            .collect();
        let new = old.replacen("user10000:x:10000:10000", "user10000:x:10000:0", 1);
        let diff = unified_diff(&old, &new, "a", "b").unwrap();
        assert_eq!(diff.matches("@@ -").count(), 1);
        assert!(diff.contains("@@ -9998,7 +9998,7 @@"));
        assert_eq!(diff.lines().filter(|l| l.starts_with('-')).count(), 2);
        assert_eq!(diff.lines().filter(|l| l.starts_with('+')).count(), 2);
    }

    #[test]
    fn test_scattered_edits_rebuild_both_sides() {
        let old = "a\nb\nc\nd\ne\nf\ng\n";
        let new = "b\nx\nc\nd\ny\nz\ng\nh\n";
        let diff = unified_diff(old, new, "a", "b").unwrap();
        let body: Vec<&str> = diff.lines().skip(3).collect();
        let side = |keep: char| -> String {
            body.iter()
                .filter(|l| l.starts_with(' ') || l.starts_with(keep))
                .map(|l| format!("{}\n", &l[1..]))
                .collect()
        };
        assert_eq!(side('-'), old);
        assert_eq!(side('+'), new);
        // Deletions print before insertions inside a change
        assert!(diff.contains("-e\n-f\n+y\n+z\n"));
    }

    #[test]
    fn test_strip_control_sequences() {
        assert_eq!(strip_control_sequences("\x1b[H\x1b[2Jhello"), "hello");
        assert_eq!(strip_control_sequences("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(
            strip_control_sequences("\x1b]0;title\x07text"),
            "text"
        );
        assert_eq!(strip_control_sequences("tab\tand\nnewline"), "tab\tand\nnewline");
    }
}
