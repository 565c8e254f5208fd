//! Line-oriented output buffer with deferred indentation.

/// Accumulates emitted text. Indentation is one tab per level and is written
/// lazily, at the first `write` after a newline, so multiple fragments can
/// share a line.
pub struct SourceWriter {
    out: String,
    indentation: usize,
    needs_indent: bool,
}

impl SourceWriter {
    pub fn new() -> SourceWriter {
        SourceWriter {
            out: String::new(),
            indentation: 0,
            needs_indent: true,
        }
    }

    pub fn write(&mut self, text: &str) {
        if self.needs_indent {
            for _ in 0..self.indentation {
                self.out.push('\t');
            }
            self.needs_indent = false;
        }
        self.out.push_str(text);
    }

    pub fn write_line(&mut self, text: &str) {
        self.write(text);
        self.newline();
    }

    pub fn newline(&mut self) {
        self.out.push('\n');
        self.needs_indent = true;
    }

    pub fn increase_indent(&mut self) {
        self.indentation += 1;
    }

    pub fn decrease_indent(&mut self) {
        self.indentation = self.indentation.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl Default for SourceWriter {
    fn default() -> SourceWriter {
        SourceWriter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indentation_is_deferred_until_text() {
        let mut writer = SourceWriter::new();
        writer.write_line("a {");
        writer.increase_indent();
        writer.write("b");
        writer.write_line(";");
        writer.decrease_indent();
        writer.write_line("}");
        assert_eq!(writer.finish(), "a {\n\tb;\n}\n");
    }

    #[test]
    fn blank_lines_carry_no_tabs() {
        let mut writer = SourceWriter::new();
        writer.increase_indent();
        writer.newline();
        writer.write_line("x");
        assert_eq!(writer.finish(), "\n\tx\n");
    }
}
