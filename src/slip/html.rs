//! Printable on-screen slip.
//!
//! The action bar carries `no-print` so only the card reaches the printer.

use super::fields::SlipFields;
use super::theme::SlipTheme;

pub fn render_slip_page(slip: &SlipFields, theme: &SlipTheme) -> String {
    let mut rows = String::new();
    for field in &slip.fields {
        let class = if field.key == "voter_number" {
            "value number"
        } else {
            "value"
        };
        rows.push_str(&format!(
            "      <div class=\"row\"><span class=\"label\">{}:</span><span class=\"{class}\" data-field=\"{}\">{}</span></div>\n",
            escape(field.label),
            field.key,
            escape(&field.value),
        ));
    }

    let watermark = theme
        .watermark
        .map(|mark| format!("    <div class=\"watermark\">{}</div>\n", escape(mark)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="bn">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>
  body {{ font-family: "Noto Sans Bengali", "SolaimanLipi", sans-serif; background: {background}; margin: 0; padding: 2rem; }}
  #voter-slip-card {{ position: relative; max-width: 32rem; margin: 0 auto; border: 2px solid {border}; border-radius: 0.75rem; padding: 2rem; overflow: hidden; }}
  .header {{ border-bottom: 1px solid {border}; padding-bottom: 1rem; margin-bottom: 1.5rem; }}
  .header h2 {{ margin: 0; color: {accent}; }}
  .header p {{ margin: 0.25rem 0 0; color: {label}; font-size: 0.875rem; }}
  .row {{ display: grid; grid-template-columns: 1fr 2fr; gap: 0.5rem; margin-bottom: 1rem; }}
  .label {{ color: {label}; font-size: 0.875rem; }}
  .value {{ color: {value}; font-weight: 600; }}
  .number {{ font-family: monospace; font-size: 1.125rem; color: {accent}; }}
  .footer {{ margin-top: 2rem; padding-top: 1rem; border-top: 1px dashed {border}; text-align: center; font-size: 0.625rem; color: {muted}; }}
  .watermark {{ position: absolute; inset: 0; display: flex; align-items: center; justify-content: center; transform: rotate(-35deg); opacity: 0.05; font-size: 3.75rem; font-weight: 700; pointer-events: none; }}
  .actions {{ display: flex; justify-content: center; gap: 1rem; margin-top: 2rem; }}
  .actions a, .actions button {{ background: {accent}; color: #fff; border: 0; border-radius: 0.75rem; padding: 1rem 1.5rem; font-weight: 700; text-decoration: none; cursor: pointer; }}
  @media print {{ .no-print {{ display: none !important; }} body {{ padding: 0; }} }}
</style>
</head>
<body>
  <div id="voter-slip-card">
{watermark}    <div class="header">
      <h2>{title}</h2>
      <p>{subtitle}</p>
    </div>
    <div class="fields">
{rows}    </div>
    <div class="footer">স্লিপ আইডি: {slip_id}<br>{footer_note}</div>
  </div>
  <div class="actions no-print">
    <button type="button" onclick="window.print()">প্রিন্ট করুন</button>
    <a href="slip.png" download>ডাউনলোড (ইমেজ)</a>
  </div>
</body>
</html>
"#,
        title = escape(theme.title),
        subtitle = escape(theme.subtitle),
        footer_note = escape(theme.footer_note),
        slip_id = escape(&slip.slip_id),
        background = theme.background.hex(),
        border = theme.card_border.hex(),
        accent = theme.accent.hex(),
        label = theme.label.hex(),
        value = theme.value.hex(),
        muted = theme.muted.hex(),
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_voter;

    #[test]
    fn test_page_lists_fields_and_hides_actions_from_print() {
        let voter = sample_voter("v1", "2611");
        let html = render_slip_page(&SlipFields::from_voter(&voter), &SlipTheme::classic());

        assert!(html.contains("data-field=\"father_name\">—</span>"));
        assert!(html.contains("data-field=\"voter_number\">2611</span>"));
        assert!(html.contains(&voter.center_name));
        assert!(html.contains("class=\"actions no-print\""));
        assert!(html.contains("@media print"));
        assert!(!html.contains("watermark\">"));
    }

    #[test]
    fn test_values_are_escaped() {
        let mut voter = sample_voter("v1", "1");
        voter.full_name = "<script>alert('x')</script>".to_string();
        let html = render_slip_page(&SlipFields::from_voter(&voter), &SlipTheme::emerald());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("DEMO COPY"));
    }
}
