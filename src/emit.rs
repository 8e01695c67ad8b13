//! Generates the bash function pair for one `@fn` directive.
//!
//! Output uses a canonical four-space indent; the splicer re-indents it
//! to match the surrounding file. The generated text opens with a usage
//! comment, then a public wrapper that parses `--flag value` pairs, and
//! finally the opening of a hidden `__name` implementation function that
//! the author's body (left in place by the splicer) completes.

use crate::directive::{Arg, FnDirective};

/// `--flag` spelling of an arg name: underscores become dashes.
fn flag(arg: &Arg) -> String {
    arg.name.as_str().replace('_', "-")
}

fn usage_for(arg: &Arg) -> String {
    let param = flag(arg);
    let upper = param.to_uppercase();
    if arg.default.is_some() {
        format!("[--{param} <{upper}>] ")
    } else {
        format!("--{param} <{upper}> ")
    }
}

/// Renders one directive into generated shell text. No trailing newline:
/// the author's body begins immediately after the directive's `{` in the
/// source, so the newline that followed it supplies the break.
pub fn emit_fn(d: &FnDirective) -> String {
    let mut out = String::new();
    let usage: String = d.args.iter().map(usage_for).collect();

    out.push_str("#\n");
    out.push_str(&format!("# usage: {} {}[ARGS]\n", d.name, usage));
    out.push_str("#\n");

    if d.args.is_empty() {
        // No flags to parse — a plain named function, body appended by
        // the splicer.
        out.push_str(&format!("function {}() {{", d.name));
        return out;
    }

    out.push_str(&format!("function {}() {{\n", d.name));
    for arg in &d.args {
        match &arg.default {
            Some(default) => {
                out.push_str(&format!("    local {}={}\n", arg.name, default));
            }
            None => {
                out.push_str(&format!("    local {}\n", arg.name));
                out.push_str(&format!("    local {}__set=0\n", arg.name));
            }
        }
    }
    out.push_str("    local args=()\n");
    out.push_str("    local i\n");
    out.push('\n');

    out.push_str("    for ((i = 1; i <= $#; i++)); do\n");
    for (idx, arg) in d.args.iter().enumerate() {
        let keyword = if idx == 0 { "if" } else { "elif" };
        out.push_str(&format!(
            "        {keyword} [ \"${{!i}}\" == \"--{}\" ]; then\n",
            flag(arg)
        ));
        out.push_str("            ((i++))\n");
        out.push_str(&format!("            {}=${{!i}}\n", arg.name));
        if arg.default.is_none() {
            out.push_str(&format!("            {}__set=1\n", arg.name));
        }
    }
    out.push_str("        else\n");
    out.push_str("            args+=(\"${!i}\")\n");
    out.push_str("        fi\n");
    out.push_str("    done\n");
    out.push('\n');

    for arg in d.args.iter().filter(|a| a.default.is_none()) {
        out.push_str(&format!("    if [ ${{{}__set}} -eq 0 ]; then\n", arg.name));
        out.push_str(&format!(
            "        echo \"[ERROR] The --{} parameter must be given.\"\n",
            flag(arg)
        ));
        out.push_str("        return 1\n");
        out.push_str("    fi\n");
    }
    out.push('\n');

    let arg_list: Vec<String> = d
        .args
        .iter()
        .map(|a| format!("\"${{{}}}\"", a.name))
        .collect();
    out.push_str(&format!(
        "    __{} {} \"${{args[@]}}\"\n",
        d.name,
        arg_list.join(" ")
    ));
    out.push_str("}\n");
    out.push('\n');

    out.push_str(&format!("function __{}() {{\n", d.name));
    for (idx, arg) in d.args.iter().enumerate() {
        out.push_str(&format!("    local {}=${{{}}}\n", arg.name, idx + 1));
    }
    out.push_str(&format!("    shift {}", d.args.len()));
    out
}
