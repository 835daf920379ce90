use std::borrow::Cow;
use std::io::{self, Write};

use crate::models::Package;

/// Column titles of the manifest, in field order.
pub const HEADER: [&str; 4] = [
    "Component Name",
    "Version",
    "License (SPDX ID)",
    "License URL",
];

/// Quote a field only when it holds a comma, a double quote or a newline.
/// Embedded quotes are doubled.
pub fn escape_field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// Write one record followed by a single `\n`.
pub fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> io::Result<()> {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.write_all(b",")?;
        }
        out.write_all(escape_field(field).as_bytes())?;
    }
    out.write_all(b"\n")
}

/// Serialize packages as the header record plus one record per package.
/// A missing license URL becomes an empty field.
pub fn write_manifest<W: Write>(out: &mut W, packages: &[Package]) -> io::Result<()> {
    write_record(out, &HEADER)?;
    for pkg in packages {
        write_record(
            out,
            &[
                &pkg.name,
                &pkg.version,
                &pkg.license,
                pkg.license_url.as_deref().unwrap_or(""),
            ],
        )?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("simple"), "simple");
        assert_eq!(escape_field("has,comma"), "\"has,comma\"");
        assert_eq!(escape_field("has \"quotes\""), "\"has \"\"quotes\"\"\"");
        assert_eq!(escape_field("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_write_manifest_layout() {
        let packages = vec![
            Package::new("escape-html", "1.0.3", "MIT", None),
            Package::new(
                "odd,name",
                "2.0.0",
                "(MIT OR Apache-2.0)",
                Some("https://example.com".to_string()),
            ),
        ];
        let mut out = Vec::new();
        write_manifest(&mut out, &packages).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Component Name,Version,License (SPDX ID),License URL\n\
             escape-html,1.0.3,MIT,\n\
             \"odd,name\",2.0.0,(MIT OR Apache-2.0),https://example.com\n"
        );
    }
}
