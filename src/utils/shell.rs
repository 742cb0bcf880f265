//! Shell quoting for displaying the commands the dispatcher runs.

/// Quote a single argument so the rendered command line can be pasted into a shell.
/// Empty strings become `''`; anything with shell metacharacters is single-quoted.
pub fn quote_arg(arg: &str) -> String {
    if arg.is_empty() {
        return "''".to_string();
    }

    const SHELL_META: &[char] = &[
        ' ', '\t', '\n', '\'', '"', '\\', '$', '`', '!', '*', '?', '[', ']', '(', ')', '{', '}',
        '<', '>', '|', '&', ';', '#', '~',
    ];

    if !arg.contains(SHELL_META) {
        return arg.to_string();
    }

    format!("'{}'", arg.replace('\'', "'\\''"))
}

pub fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|a| quote_arg(a))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render `program args...` as a single display line.
pub fn render_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        quote_arg(program)
    } else {
        format!("{} {}", quote_arg(program), quote_args(args))
    }
}
