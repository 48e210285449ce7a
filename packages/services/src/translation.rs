/// Hook through which every user-facing message passes.
///
/// Templates use `%s` placeholders that are filled positionally from `args`.
pub trait Translator: Send + Sync {
    fn translate(&self, template: &str, args: &[String]) -> String;
}

/// Leaves templates in their source language and only substitutes arguments.
#[derive(Clone, Copy, Debug, Default)]
pub struct Untranslated;

impl Translator for Untranslated {
    fn translate(&self, template: &str, args: &[String]) -> String {
        format_template(template, args)
    }
}

/// Replaces each `%s` with the next argument. `%%` is a literal percent sign.
/// Placeholders beyond the supplied arguments are left empty.
pub fn format_template(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('s') => {
                chars.next();
                if let Some(arg) = args.next() {
                    out.push_str(arg);
                }
            }
            Some('%') => {
                chars.next();
                out.push('%');
            }
            _ => out.push('%'),
        }
    }

    out
}
