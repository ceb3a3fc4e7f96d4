use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

// [0] {main} @ /srv/app/index.php:12
static STACK_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<level>\d+)\] (?P<location>.+) @ (?P<file>.+):(?P<line>\d+)$")
        .expect("Invalid stack line regex")
});

//    ⬦ $items[0] = (string [3]) 'abc'
static WATCH_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<indent> *) (?P<marker>\S+) (?P<name>.+?) = \((?P<kind>[^)]*)\)(?: (?P<value>.*))?$",
    )
    .expect("Invalid watch line regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
    pub level: u32,
    /// Function or method name; `main` at the top level.
    pub location: String,
    pub file: String,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchVariable {
    pub name: String,
    /// Type and size as rendered, e.g. `int` or `array [2]`.
    pub kind: String,
    pub value: String,
    /// Nesting level below a top-level variable.
    pub depth: usize,
}

/// Parses the stack window, one frame per `[level] where @ file:line` row.
pub fn parse_stack(content: &str) -> Vec<StackFrame> {
    content
        .lines()
        .filter_map(|line| {
            let caps = STACK_LINE.captures(line.trim_end())?;
            Some(StackFrame {
                level: caps["level"].parse().ok()?,
                location: caps["location"].to_string(),
                file: caps["file"].to_string(),
                line: caps["line"].parse().ok()?,
            })
        })
        .collect()
}

/// Parses the watch (or trace) window into its variable rows.
///
/// Context tabs, eval titles and the tree connectors of the expanded style
/// are skipped.
pub fn parse_watch(content: &str) -> Vec<WatchVariable> {
    content
        .lines()
        .filter_map(|line| {
            let caps = WATCH_LINE.captures(line.trim_end())?;
            Some(WatchVariable {
                name: caps["name"].to_string(),
                kind: caps["kind"].to_string(),
                value: caps
                    .name("value")
                    .map(|v| v.as_str().to_string())
                    .unwrap_or_default(),
                depth: caps["indent"].len() / 2,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK_WINDOW: &str = "[0] {main} @ /home/dev/tmpspace/test.php:4
[1] Foo->bar @ /home/dev/tmpspace/lib/foo.php:27
[2] main @ C:/work/app.php:100
";

    const WATCH_WINDOW: &str = "[ *Locals ] [ Superglobals ]

 ⬦ $var1 = (int) 1
 ⬦ $var2 = (string [5]) 'hello'
 ▾ $arr = (array [2])
   ⬦ $arr[0] = (int) 10
   ⬦ $arr[1] = (bool) true
 ▸ $obj = (Foo [1])
 ⬦ $empty = (null)
";

    #[test]
    fn test_parse_stack_frames() {
        let frames = parse_stack(STACK_WINDOW);
        assert_eq!(frames.len(), 3);
        assert_eq!(
            frames[0],
            StackFrame {
                level: 0,
                location: "{main}".to_string(),
                file: "/home/dev/tmpspace/test.php".to_string(),
                line: 4,
            }
        );
        assert_eq!(frames[1].location, "Foo->bar");
        assert_eq!(frames[1].line, 27);
    }

    #[test]
    fn test_parse_stack_keeps_drive_letter_in_file() {
        let frames = parse_stack(STACK_WINDOW);
        assert_eq!(frames[2].file, "C:/work/app.php");
        assert_eq!(frames[2].line, 100);
    }

    #[test]
    fn test_parse_stack_ignores_other_lines() {
        assert!(parse_stack("").is_empty());
        assert!(parse_stack("Status: break\nConnected to 127.0.0.1\n").is_empty());
    }

    #[test]
    fn test_parse_watch_variables() {
        let vars = parse_watch(WATCH_WINDOW);
        let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["$var1", "$var2", "$arr", "$arr[0]", "$arr[1]", "$obj", "$empty"]
        );

        assert_eq!(vars[0].kind, "int");
        assert_eq!(vars[0].value, "1");
        assert_eq!(vars[1].kind, "string [5]");
        assert_eq!(vars[1].value, "'hello'");
    }

    #[test]
    fn test_parse_watch_depth_and_empty_values() {
        let vars = parse_watch(WATCH_WINDOW);
        assert_eq!(vars[2].depth, 0);
        assert_eq!(vars[2].value, "");
        assert_eq!(vars[3].depth, 1);
        assert_eq!(vars[6].kind, "null");
        assert_eq!(vars[6].value, "");
    }

    #[test]
    fn test_parse_watch_skips_expanded_connectors() {
        let content = " ▾ $a = (array [1])\n \\\n   ⬦ $a[0] = (int) 1\n  /\n";
        let vars = parse_watch(content);
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[1].name, "$a[0]");
    }
}
