/// Fixed-point number format with optional thousands grouping, the equivalent of `{:,.Nf}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimals: u8,
    pub thousands: bool,
}

impl NumberFormat {
    #[must_use]
    pub const fn grouped(decimals: u8) -> Self {
        Self { decimals, thousands: true }
    }

    #[must_use]
    pub fn format(self, value: f64) -> String {
        if !value.is_finite() {
            return value.to_string();
        }

        let fixed = format!("{value:.prec$}", prec = usize::from(self.decimals));
        if !self.thousands {
            return fixed;
        }

        let (sign, digits) = fixed.strip_prefix('-').map_or(("", fixed.as_str()), |rest| ("-", rest));
        let (int_part, frac_part) = digits.split_once('.').map_or((digits, None), |(i, f)| (i, Some(f)));

        let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
        out.push_str(sign);
        for (i, c) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(c);
        }

        if let Some(frac) = frac_part {
            out.push('.');
            out.push_str(frac);
        }

        out
    }

    /// The matching spreadsheet number format, e.g. `#,##0.00`.
    #[must_use]
    pub fn excel_pattern(self) -> String {
        let mut pattern = String::from(if self.thousands { "#,##0" } else { "0" });
        if self.decimals > 0 {
            pattern.push('.');
            for _ in 0..self.decimals {
                pattern.push('0');
            }
        }
        pattern
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::grouped(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(NumberFormat::grouped(1).format(1_234_567.3), "1,234,567.3");
        assert_eq!(NumberFormat::grouped(0).format(999.0), "999");
        assert_eq!(NumberFormat::grouped(0).format(1000.0), "1,000");
        assert_eq!(NumberFormat::grouped(2).format(0.5), "0.50");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(NumberFormat::grouped(0).format(-1_234_567.0), "-1,234,567");
    }

    #[test]
    fn test_format_without_grouping() {
        let format = NumberFormat { decimals: 3, thousands: false };
        assert_eq!(format.format(12345.0), "12345.000");
    }

    #[test]
    fn test_format_non_finite() {
        assert_eq!(NumberFormat::default().format(f64::NAN), "NaN");
        assert_eq!(NumberFormat::default().format(f64::INFINITY), "inf");
    }

    #[test]
    fn test_excel_pattern() {
        assert_eq!(NumberFormat::grouped(0).excel_pattern(), "#,##0");
        assert_eq!(NumberFormat::grouped(2).excel_pattern(), "#,##0.00");
        assert_eq!(NumberFormat { decimals: 1, thousands: false }.excel_pattern(), "0.0");
    }
}
