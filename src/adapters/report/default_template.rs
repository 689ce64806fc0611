//! Default Typst report template.
//!
//! Built-in markup with `{{PLACEHOLDER}}` markers resolved by the parent
//! module. A custom template file can replace this wholesale; any subset of
//! the placeholders is allowed.

pub fn template() -> &'static str {
    r#"#set page(margin: 2cm)
#set text(size: 10pt)

= Macro Signal Report

== Run Configuration

{{CONFIG_SUMMARY}}

== Current Status

{{CURRENT_STATUS}}

== Performance Summary

{{SUMMARY_TABLE}}

== Price and Signals

{{PRICE_CHART}}

{{DRAWDOWN_CHART}}

== Trade History

{{TRADE_LOG}}

== Recent Signals

{{RECENT_SIGNALS}}
"#
}
