//! Streaming, indentation-tracked XML writer.
//!
//! Two element layouts are supported: the compact one used by MSBuild files
//! (`<Name A="1">`) and the attribute-per-line one of `.vcproj` files. Lines
//! end with CRLF.

use std::io::{self, Write};

const EOL: &str = "\r\n";

/// Escapes an attribute value. Line breaks are written as character
/// references so multi-statement commands survive a round trip.
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\r' => out.push_str("&#x0D;"),
            '\n' => out.push_str("&#x0A;"),
            c => out.push(c),
        }
    }
    out
}

pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub struct XmlWriter<W: Write> {
    out: W,
    indent: &'static str,
    open: Vec<String>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(out: W, indent: &'static str) -> Self {
        Self {
            out,
            indent,
            open: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn pad(&self, extra: usize) -> String {
        self.indent.repeat(self.open.len() + extra)
    }

    fn line(&mut self, extra: usize, content: &str) -> io::Result<()> {
        let pad = self.pad(extra);
        write!(self.out, "{}{}{}", pad, content, EOL)
    }

    fn inline_attributes(attrs: &[(&str, &str)]) -> String {
        attrs
            .iter()
            .map(|(name, value)| format!(" {}=\"{}\"", name, escape_attribute(value)))
            .collect()
    }

    pub fn declaration(&mut self, encoding: &str) -> io::Result<()> {
        self.line(0, &format!("<?xml version=\"1.0\" encoding=\"{}\"?>", encoding))
    }

    /// `<name a="1">`
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.line(0, &format!("<{}{}>", name, Self::inline_attributes(attrs)))?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// `<name a="1" />`
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.line(0, &format!("<{}{} />", name, Self::inline_attributes(attrs)))
    }

    /// `<name a="1">text</name>`
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> io::Result<()> {
        self.line(
            0,
            &format!(
                "<{}{}>{}</{}>",
                name,
                Self::inline_attributes(attrs),
                escape_text(text),
                name
            ),
        )
    }

    fn multiline_head(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.line(0, &format!("<{}", name))?;
        for (attr, value) in attrs {
            self.line(1, &format!("{}=\"{}\"", attr, escape_attribute(value)))?;
        }
        Ok(())
    }

    /// Attribute-per-line start tag.
    pub fn open_multiline(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.multiline_head(name, attrs)?;
        self.line(1, ">")?;
        self.open.push(name.to_string());
        Ok(())
    }

    /// Attribute-per-line empty element.
    pub fn empty_multiline(&mut self, name: &str, attrs: &[(&str, &str)]) -> io::Result<()> {
        self.multiline_head(name, attrs)?;
        self.line(1, "/>")
    }

    pub fn close(&mut self) -> io::Result<()> {
        match self.open.pop() {
            Some(name) => self.line(0, &format!("</{}>", name)),
            None => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "close without an open element",
            )),
        }
    }

    /// Closes every open element and returns the sink.
    pub fn finish(mut self) -> io::Result<W> {
        while !self.open.is_empty() {
            self.close()?;
        }
        self.out.flush()?;
        Ok(self.out)
    }
}
