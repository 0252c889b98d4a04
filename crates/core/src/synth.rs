//! Method synthesis: render the generated `memory_stats` method of an entity
//! and the aggregator's fan-out method as C++ source lines.

use crate::config::GeneratorConfig;
use crate::fields::FoundField;
use crate::naming::to_snake_case;
use crate::types::Entity;

/// One rendered entry: the key written to the output and the statement tail
/// that appends its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub key: String,
    pub value_statement: String,
}

/// Render a method from its signature line and ordered entries.
///
/// Each entry becomes a single statement line; a `","` separator statement
/// sits between consecutive entries. The method ends with `}` and a blank line.
pub fn render_method(signature: &str, entries: &[Entry], output_param: &str) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() * 2 + 3);
    lines.push(signature.to_string());
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            lines.push(format!("  {output_param}.push_back(\",\");"));
        }
        lines.push(format!(
            "  {output_param}.push_back(\"\\\"{}\\\":{}",
            entry.key, entry.value_statement
        ));
    }
    lines.push("}".to_string());
    lines.push(String::new());
    lines
}

/// Substring identifying the generated method of an entity.
pub fn entity_signature_marker(config: &GeneratorConfig) -> String {
    format!("::{}(", config.entity_method)
}

/// Substring identifying the aggregator's generated method.
pub fn aggregator_signature_marker(config: &GeneratorConfig) -> String {
    format!("::{}(", config.aggregator_method)
}

/// Member name of an entity on the owner object: `TimeZone` -> `time_zone_manager_`.
pub fn member_name(entity: &Entity, config: &GeneratorConfig) -> String {
    format!("{}{}", to_snake_case(&entity.base_name), config.member_suffix)
}

/// The per-entity diagnostic method: one entry per field, in declaration order.
pub fn entity_method(entity: &Entity, fields: &[FoundField], config: &GeneratorConfig) -> Vec<String> {
    let out = &config.output_param;
    let signature = format!(
        "void {}::{}(vector<string> &{out}) {{",
        entity.class_ident, config.entity_method
    );
    let entries: Vec<Entry> = fields
        .iter()
        .map(|field| Entry {
            key: field.name.clone(),
            value_statement: format!(
                "\"); {out}.push_back(std::to_string({}.{}));",
                field.name, field.count_query
            ),
        })
        .collect();
    render_method(&signature, &entries, out)
}

/// The aggregator method: one call per entity, in discovery order.
pub fn aggregator_method(entities: &[Entity], config: &GeneratorConfig) -> Vec<String> {
    let out = &config.output_param;
    let signature = format!(
        "void {}{}::{}(vector<string> &{out}) const {{",
        config.aggregator_name, config.entity_suffix, config.aggregator_method
    );
    let entries: Vec<Entry> = entities
        .iter()
        .map(|entity| {
            let member = member_name(entity, config);
            Entry {
                value_statement: format!(
                    "{{\"); {}{member}->{}({out}); {out}.push_back(\"}}\");",
                    config.owner_expr, config.entity_method
                ),
                key: member,
            }
        })
        .collect();
    render_method(&signature, &entries, out)
}
