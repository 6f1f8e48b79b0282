//! Layout name sanitizing for artifact file names.

/// Reduce a layout name to `[A-Za-z0-9_]` for use in a file name.
///
/// Spaces become underscores, accented Latin-1 letters fold to their
/// ASCII base letter, and everything else is dropped. Only the artifact
/// file name goes through this; the engine always receives the layout
/// name as requested.
pub fn sanitize_layout_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let c = if c == ' ' { '_' } else { c };
        if let Some(folded) = fold_latin1(c) {
            out.push(folded);
        } else if c.is_ascii_alphanumeric() || c == '_' {
            out.push(c);
        }
    }
    out
}

/// ASCII base letter for Latin-1 letters that carry a diacritic.
///
/// Letters without a plain ASCII decomposition (for example `ø` and `ß`)
/// stay unmapped and are dropped by the caller.
fn fold_latin1(c: char) -> Option<char> {
    Some(match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ì'..='ï' => 'i',
        'ñ' => 'n',
        'ò'..='ö' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    })
}
