use crate::api_connection::endpoints::{NewRecipe, NewRecipeIngredient};

/// Parses one `quantity [unit] name` line, e.g. `200 g macarrão`.
///
/// Two tokens are read as quantity and name with no unit. Lines with fewer
/// than two tokens are rejected.
pub fn parse_ingredient_line(line: &str) -> Option<NewRecipeIngredient> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts.as_slice() {
        [] | [_] => None,
        [quantity, name] => Some(NewRecipeIngredient {
            ingredient_name: name.to_string(),
            quantity: quantity.to_string(),
            unit: None,
        }),
        [quantity, unit, name @ ..] => Some(NewRecipeIngredient {
            ingredient_name: name.join(" "),
            quantity: quantity.to_string(),
            unit: Some(unit.to_string()),
        }),
    }
}

/// Parses a block of ingredient lines, dropping blanks and lines that do not parse.
pub fn parse_ingredient_lines(text: &str) -> Vec<NewRecipeIngredient> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let parsed = parse_ingredient_line(line);
            if parsed.is_none() {
                tracing::warn!(line, "ignoring ingredient line without quantity and name");
            }
            parsed
        })
        .collect()
}

pub fn build_new_recipe(name: &str, instructions: &str, ingredient_lines: &str) -> NewRecipe {
    NewRecipe {
        name: name.trim().to_string(),
        instructions: instructions.to_string(),
        ingredients: parse_ingredient_lines(ingredient_lines),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_with_unit() {
        let parsed = parse_ingredient_line("200 g macarrão integral").unwrap();
        assert_eq!(parsed.quantity, "200");
        assert_eq!(parsed.unit.as_deref(), Some("g"));
        assert_eq!(parsed.ingredient_name, "macarrão integral");
    }

    #[test]
    fn test_parse_line_without_unit() {
        let parsed = parse_ingredient_line("  2 tomates ").unwrap();
        assert_eq!(parsed.quantity, "2");
        assert_eq!(parsed.unit, None);
        assert_eq!(parsed.ingredient_name, "tomates");
    }

    #[test]
    fn test_parse_line_rejects_single_token() {
        assert!(parse_ingredient_line("sal").is_none());
        assert!(parse_ingredient_line("   ").is_none());
    }

    #[test]
    fn test_parse_lines_skips_blank_and_invalid() {
        let text = "200 g macarrão\n\nsal\n1 unidade cebola\n";
        let parsed = parse_ingredient_lines(text);
        let names: Vec<&str> = parsed.iter().map(|i| i.ingredient_name.as_str()).collect();
        assert_eq!(names, vec!["macarrão", "cebola"]);
    }

    #[test]
    fn test_build_new_recipe() {
        let recipe = build_new_recipe(" Bolonhesa ", "1. Ferva água", "200 g macarrão");
        assert_eq!(recipe.name, "Bolonhesa");
        assert_eq!(recipe.ingredients.len(), 1);
    }
}
