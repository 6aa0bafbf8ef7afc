//! Container-level `rename_all` rules, with serde's naming semantics.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    LowerCase,
    UpperCase,
    PascalCase,
    CamelCase,
    SnakeCase,
    ScreamingSnakeCase,
    KebabCase,
    ScreamingKebabCase,
}

impl RenameRule {
    pub fn from_str(rule: &str) -> Option<Self> {
        let rule = match rule {
            "lowercase" => RenameRule::LowerCase,
            "UPPERCASE" => RenameRule::UpperCase,
            "PascalCase" => RenameRule::PascalCase,
            "camelCase" => RenameRule::CamelCase,
            "snake_case" => RenameRule::SnakeCase,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnakeCase,
            "kebab-case" => RenameRule::KebabCase,
            "SCREAMING-KEBAB-CASE" => RenameRule::ScreamingKebabCase,
            _ => return None,
        };
        Some(rule)
    }

    /// Fields are written in snake_case.
    pub fn apply_to_field(self, field: &str) -> String {
        match self {
            RenameRule::LowerCase | RenameRule::SnakeCase => field.to_string(),
            RenameRule::UpperCase | RenameRule::ScreamingSnakeCase => field.to_ascii_uppercase(),
            RenameRule::PascalCase => {
                let mut pascal = String::new();
                let mut capitalize = true;
                for ch in field.chars() {
                    if ch == '_' {
                        capitalize = true;
                    } else if capitalize {
                        pascal.push(ch.to_ascii_uppercase());
                        capitalize = false;
                    } else {
                        pascal.push(ch);
                    }
                }
                pascal
            }
            RenameRule::CamelCase => {
                let pascal = RenameRule::PascalCase.apply_to_field(field);
                lower_first(&pascal)
            }
            RenameRule::KebabCase => field.replace('_', "-"),
            RenameRule::ScreamingKebabCase => field.to_ascii_uppercase().replace('_', "-"),
        }
    }

    /// Variants are written in PascalCase.
    pub fn apply_to_variant(self, variant: &str) -> String {
        match self {
            RenameRule::PascalCase => variant.to_string(),
            RenameRule::LowerCase => variant.to_ascii_lowercase(),
            RenameRule::UpperCase => variant.to_ascii_uppercase(),
            RenameRule::CamelCase => lower_first(variant),
            RenameRule::SnakeCase => {
                let mut snake = String::new();
                for (i, ch) in variant.char_indices() {
                    if i > 0 && ch.is_uppercase() {
                        snake.push('_');
                    }
                    snake.push(ch.to_ascii_lowercase());
                }
                snake
            }
            RenameRule::ScreamingSnakeCase => {
                RenameRule::SnakeCase.apply_to_variant(variant).to_ascii_uppercase()
            }
            RenameRule::KebabCase => RenameRule::SnakeCase.apply_to_variant(variant).replace('_', "-"),
            RenameRule::ScreamingKebabCase => RenameRule::ScreamingSnakeCase
                .apply_to_variant(variant)
                .replace('_', "-"),
        }
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_rules() {
        let field = "interface_field";
        assert_eq!(RenameRule::CamelCase.apply_to_field(field), "interfaceField");
        assert_eq!(RenameRule::PascalCase.apply_to_field(field), "InterfaceField");
        assert_eq!(RenameRule::ScreamingSnakeCase.apply_to_field(field), "INTERFACE_FIELD");
        assert_eq!(RenameRule::KebabCase.apply_to_field(field), "interface-field");
        assert_eq!(RenameRule::SnakeCase.apply_to_field(field), "interface_field");
    }

    #[test]
    fn test_variant_rules() {
        let variant = "NotFound";
        assert_eq!(RenameRule::LowerCase.apply_to_variant(variant), "notfound");
        assert_eq!(RenameRule::CamelCase.apply_to_variant(variant), "notFound");
        assert_eq!(RenameRule::SnakeCase.apply_to_variant(variant), "not_found");
        assert_eq!(RenameRule::ScreamingKebabCase.apply_to_variant(variant), "NOT-FOUND");
    }

    #[test]
    fn test_unknown_rule() {
        assert_eq!(RenameRule::from_str("Title Case"), None);
        assert_eq!(RenameRule::from_str("camelCase"), Some(RenameRule::CamelCase));
    }
}
