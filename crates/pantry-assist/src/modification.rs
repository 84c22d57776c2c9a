//! Modification types and their ingredient substitution tables.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use pantry_core::Ingredient;

/// Supported recipe modifications.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModificationKind {
    Healthier,
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    LowCarb,
}

/// One row of a substitution table: an ingredient term and its replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SubstitutionRule {
    pub term: &'static str,
    pub substitute: &'static str,
}

const fn rule(term: &'static str, substitute: &'static str) -> SubstitutionRule {
    SubstitutionRule { term, substitute }
}

// Multi-word terms come before the single words they contain.

static MEAT_RULES: &[SubstitutionRule] = &[
    rule("chicken broth", "vegetable broth"),
    rule("chicken stock", "vegetable stock"),
    rule("beef broth", "mushroom broth"),
    rule("beef stock", "mushroom stock"),
    rule("ground beef", "cooked brown lentils"),
    rule("chicken", "extra-firm tofu"),
    rule("beef", "seitan"),
    rule("pork", "smoked tempeh"),
    rule("bacon", "smoked tempeh strips"),
    rule("sausage", "plant-based sausage"),
    rule("turkey", "seasoned seitan"),
    rule("ham", "smoked tofu"),
    rule("lamb", "roasted jackfruit"),
    rule("shrimp", "king oyster mushrooms"),
    rule("fish sauce", "soy sauce with a pinch of seaweed"),
    rule("anchovy", "capers"),
    rule("salmon", "marinated tofu"),
    rule("tuna", "mashed chickpeas"),
    rule("fish", "marinated tofu"),
    rule("gelatin", "agar agar"),
];

static ANIMAL_PRODUCT_RULES: &[SubstitutionRule] = &[
    rule("buttermilk", "oat milk with a splash of lemon juice"),
    rule("cream cheese", "cashew cream cheese"),
    rule("sour cream", "cashew cream"),
    rule("heavy cream", "coconut cream"),
    rule("butter", "plant-based butter"),
    rule("milk", "oat milk"),
    rule("cream", "coconut cream"),
    rule("parmesan", "nutritional yeast"),
    rule("cheese", "nutritional yeast"),
    rule("yogurt", "coconut yogurt"),
    rule("egg", "flax egg (1 tbsp ground flaxseed + 3 tbsp water)"),
    rule("honey", "maple syrup"),
];

static GLUTEN_RULES: &[SubstitutionRule] = &[
    rule("all-purpose flour", "gluten-free flour blend"),
    rule("flour", "gluten-free flour blend"),
    rule("breadcrumbs", "gluten-free breadcrumbs"),
    rule("bread", "gluten-free bread"),
    rule("spaghetti", "gluten-free spaghetti"),
    rule("pasta", "gluten-free pasta"),
    rule("noodles", "rice noodles"),
    rule("soy sauce", "tamari"),
    rule("couscous", "quinoa"),
    rule("barley", "brown rice"),
    rule("tortilla", "corn tortilla"),
    rule("beer", "gluten-free beer"),
];

static DAIRY_RULES: &[SubstitutionRule] = &[
    rule("buttermilk", "almond milk with a splash of lemon juice"),
    rule("cream cheese", "dairy-free cream cheese"),
    rule("sour cream", "dairy-free sour cream"),
    rule("heavy cream", "coconut cream"),
    rule("butter", "olive oil or dairy-free butter"),
    rule("milk", "unsweetened almond milk"),
    rule("cream", "coconut cream"),
    rule("parmesan", "nutritional yeast"),
    rule("cheese", "dairy-free cheese"),
    rule("yogurt", "coconut yogurt"),
];

static HEALTHIER_RULES: &[SubstitutionRule] = &[
    rule("heavy cream", "half-and-half or evaporated skim milk"),
    rule("sour cream", "plain Greek yogurt"),
    rule("ground beef", "lean ground turkey"),
    rule("white rice", "brown rice"),
    rule("white bread", "whole-grain bread"),
    rule("vegetable oil", "olive oil"),
    rule("butter", "olive oil"),
    rule("bacon", "turkey bacon"),
    rule("sugar", "half the amount of maple syrup"),
    rule("pasta", "whole-wheat pasta"),
    rule("spaghetti", "whole-wheat spaghetti"),
    rule("mayonnaise", "plain Greek yogurt"),
];

static LOW_CARB_RULES: &[SubstitutionRule] = &[
    rule("all-purpose flour", "almond flour"),
    rule("flour", "almond flour"),
    rule("spaghetti", "zucchini noodles"),
    rule("pasta", "zucchini noodles"),
    rule("noodles", "shirataki noodles"),
    rule("rice", "cauliflower rice"),
    rule("potato", "cauliflower"),
    rule("bread", "lettuce wraps"),
    rule("tortilla", "low-carb tortilla"),
    rule("sugar", "erythritol or monk fruit sweetener"),
];

/// A rule paired with its precompiled term pattern.
type CompiledTable = Vec<(SubstitutionRule, Regex)>;

fn compile(rules: &[SubstitutionRule]) -> CompiledTable {
    rules
        .iter()
        .filter_map(|r| term_pattern(r.term).map(|re| (*r, re)))
        .collect()
}

static HEALTHIER: LazyLock<CompiledTable> = LazyLock::new(|| compile(HEALTHIER_RULES));
static VEGETARIAN: LazyLock<CompiledTable> = LazyLock::new(|| compile(MEAT_RULES));
static VEGAN: LazyLock<CompiledTable> =
    LazyLock::new(|| compile(&[MEAT_RULES, ANIMAL_PRODUCT_RULES].concat()));
static GLUTEN_FREE: LazyLock<CompiledTable> = LazyLock::new(|| compile(GLUTEN_RULES));
static DAIRY_FREE: LazyLock<CompiledTable> = LazyLock::new(|| compile(DAIRY_RULES));
static LOW_CARB: LazyLock<CompiledTable> = LazyLock::new(|| compile(LOW_CARB_RULES));

impl ModificationKind {
    pub const ALL: [ModificationKind; 6] = [
        ModificationKind::Healthier,
        ModificationKind::Vegetarian,
        ModificationKind::Vegan,
        ModificationKind::GlutenFree,
        ModificationKind::DairyFree,
        ModificationKind::LowCarb,
    ];

    /// Canonical wire name (`"gluten-free"`, `"low-carb"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            ModificationKind::Healthier => "healthier",
            ModificationKind::Vegetarian => "vegetarian",
            ModificationKind::Vegan => "vegan",
            ModificationKind::GlutenFree => "gluten-free",
            ModificationKind::DairyFree => "dairy-free",
            ModificationKind::LowCarb => "low-carb",
        }
    }

    /// Title-case label used as a recipe title prefix.
    pub fn label(self) -> &'static str {
        match self {
            ModificationKind::Healthier => "Healthier",
            ModificationKind::Vegetarian => "Vegetarian",
            ModificationKind::Vegan => "Vegan",
            ModificationKind::GlutenFree => "Gluten-Free",
            ModificationKind::DairyFree => "Dairy-Free",
            ModificationKind::LowCarb => "Low-Carb",
        }
    }

    /// One-line description of what the modification aims for.
    pub fn goal(self) -> &'static str {
        match self {
            ModificationKind::Healthier => "less saturated fat, refined carbs and added sugar",
            ModificationKind::Vegetarian => "no meat or fish",
            ModificationKind::Vegan => "no animal products at all",
            ModificationKind::GlutenFree => "no wheat, barley, rye or other gluten sources",
            ModificationKind::DairyFree => "no milk-based ingredients",
            ModificationKind::LowCarb => "far fewer starches and sugars",
        }
    }

    /// Why a substituted ingredient was changed.
    pub fn reason(self) -> &'static str {
        match self {
            ModificationKind::Healthier => "Lighter alternative with less saturated fat or sugar",
            ModificationKind::Vegetarian => "Replaces meat or fish with a vegetarian protein",
            ModificationKind::Vegan => "Replaces an animal product with a plant-based one",
            ModificationKind::GlutenFree => "Replaces a gluten-containing ingredient",
            ModificationKind::DairyFree => "Replaces a dairy ingredient",
            ModificationKind::LowCarb => "Replaces a high-carbohydrate ingredient",
        }
    }

    /// Expected effect on nutrition, used by the fallback result.
    pub fn nutritional_impact(self) -> &'static str {
        match self {
            ModificationKind::Healthier => {
                "Lower in saturated fat and added sugar, with more fibre from whole grains."
            }
            ModificationKind::Vegetarian => {
                "Lower in saturated fat and cholesterol; protein now comes from plant sources."
            }
            ModificationKind::Vegan => {
                "Free of cholesterol and lower in saturated fat; check vitamin B12 and protein intake."
            }
            ModificationKind::GlutenFree => {
                "Similar calories; suitable for gluten-sensitive diets, though texture may differ."
            }
            ModificationKind::DairyFree => {
                "Free of lactose; calcium content may drop unless fortified alternatives are used."
            }
            ModificationKind::LowCarb => {
                "Substantially fewer carbohydrates and calories, with more vegetables per serving."
            }
        }
    }

    /// Substitution rules in match priority order, with compiled patterns.
    fn table(self) -> &'static [(SubstitutionRule, Regex)] {
        match self {
            ModificationKind::Healthier => HEALTHIER.as_slice(),
            ModificationKind::Vegetarian => VEGETARIAN.as_slice(),
            ModificationKind::Vegan => VEGAN.as_slice(),
            ModificationKind::GlutenFree => GLUTEN_FREE.as_slice(),
            ModificationKind::DairyFree => DAIRY_FREE.as_slice(),
            ModificationKind::LowCarb => LOW_CARB.as_slice(),
        }
    }

    /// First rule whose term appears in the ingredient name.
    pub fn rule_for(self, ingredient_name: &str) -> Option<SubstitutionRule> {
        self.table()
            .iter()
            .find(|(_, pattern)| pattern.is_match(ingredient_name))
            .map(|(rule, _)| *rule)
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModificationKind {
    type Err = String;

    /// Accepts kebab, snake and camel case (`gluten-free`, `gluten_free`,
    /// `glutenFree`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "healthier" | "healthy" => Ok(ModificationKind::Healthier),
            "vegetarian" => Ok(ModificationKind::Vegetarian),
            "vegan" => Ok(ModificationKind::Vegan),
            "glutenfree" => Ok(ModificationKind::GlutenFree),
            "dairyfree" => Ok(ModificationKind::DairyFree),
            "lowcarb" => Ok(ModificationKind::LowCarb),
            _ => Err(format!(
                "unknown modification type '{}', expected one of: {}",
                s.trim(),
                ModificationKind::ALL
                    .iter()
                    .map(|k| k.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

// ─────────────────────────────────────────────
// Matching
// ─────────────────────────────────────────────

/// Whole-word, case-insensitive pattern for `term`, allowing a plural
/// `s`/`es`.
///
/// `"egg"` matches `"large eggs"` but not `"eggplant"`.
pub fn term_pattern(term: &str) -> Option<Regex> {
    Regex::new(&format!(r"(?i)\b{}(?:e?s)?\b", regex::escape(term))).ok()
}

/// Replace whole-word occurrences of each `(term, replacement)` pair in a
/// single pass, so a replacement is never rewritten by a later pair.
pub fn replace_terms(text: &str, pairs: &[(&str, &str)]) -> String {
    if pairs.is_empty() {
        return text.to_string();
    }
    let mut ordered: Vec<(&str, &str)> = pairs.to_vec();
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let alternation = ordered
        .iter()
        .map(|(term, _)| format!("({})", regex::escape(term)))
        .collect::<Vec<_>>()
        .join("|");
    let Ok(re) = Regex::new(&format!(r"(?i)\b(?:{alternation})(?:e?s)?\b")) else {
        return text.to_string();
    };

    re.replace_all(text, |caps: &regex::Captures<'_>| {
        ordered
            .iter()
            .enumerate()
            .find(|(i, _)| caps.get(i + 1).is_some())
            .map(|(_, (_, replacement))| replacement.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    })
    .into_owned()
}

/// A substitution applied to one recipe ingredient.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedSubstitution {
    /// The ingredient line as written.
    pub original: String,
    /// The matched rule term, used for instruction rewriting.
    pub term: &'static str,
    pub substitute: &'static str,
}

/// Match every ingredient against the kind's table. Each ingredient is
/// substituted at most once, by its first matching rule.
pub fn substitutions_for(
    kind: ModificationKind,
    ingredients: &[Ingredient],
) -> Vec<AppliedSubstitution> {
    ingredients
        .iter()
        .filter_map(|ingredient| {
            let name = if ingredient.name.trim().is_empty() {
                ingredient.original.as_str()
            } else {
                ingredient.name.as_str()
            };
            kind.rule_for(name).map(|r| AppliedSubstitution {
                original: ingredient.display(),
                term: r.term,
                substitute: r.substitute,
            })
        })
        .collect()
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(name: &str) -> Ingredient {
        Ingredient {
            name: name.to_string(),
            original: format!("1 cup {name}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_variants() {
        assert_eq!("vegan".parse::<ModificationKind>(), Ok(ModificationKind::Vegan));
        assert_eq!("gluten-free".parse::<ModificationKind>(), Ok(ModificationKind::GlutenFree));
        assert_eq!("gluten_free".parse::<ModificationKind>(), Ok(ModificationKind::GlutenFree));
        assert_eq!("glutenFree".parse::<ModificationKind>(), Ok(ModificationKind::GlutenFree));
        assert_eq!(" Low-Carb ".parse::<ModificationKind>(), Ok(ModificationKind::LowCarb));
        assert_eq!("healthier".parse::<ModificationKind>(), Ok(ModificationKind::Healthier));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "carnivore".parse::<ModificationKind>().unwrap_err();
        assert!(err.contains("carnivore"));
        assert!(err.contains("dairy-free"));
    }

    #[test]
    fn test_display_roundtrip() {
        for kind in ModificationKind::ALL {
            assert_eq!(kind.to_string().parse::<ModificationKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_term_pattern_whole_words() {
        let matches = |text: &str, term: &str| term_pattern(term).unwrap().is_match(text);
        assert!(matches("large eggs", "egg"));
        assert!(matches("Egg", "egg"));
        assert!(!matches("eggplant", "egg"));
        assert!(matches("unsalted butter", "butter"));
        assert!(!matches("buttermilk", "butter"));
        assert!(matches("potatoes", "potato"));
        assert!(matches("low-sodium soy sauce", "soy sauce"));
    }

    #[test]
    fn test_replace_terms() {
        let step = "Whisk the eggs, then fold in the Egg whites. Add eggplant.";
        assert_eq!(
            replace_terms(step, &[("egg", "flax egg")]),
            "Whisk the flax egg, then fold in the flax egg whites. Add eggplant."
        );
    }

    #[test]
    fn test_replace_terms_single_pass() {
        let step = "Stir the milk into the buttermilk.";
        let replaced = replace_terms(
            step,
            &[("milk", "oat milk"), ("buttermilk", "oat milk with lemon")],
        );
        assert_eq!(replaced, "Stir the oat milk into the oat milk with lemon.");
        assert_eq!(replace_terms(step, &[]), step);
    }

    #[test]
    fn test_vegan_table_covers_meat_and_dairy() {
        let vegan = ModificationKind::Vegan;
        assert_eq!(vegan.rule_for("chicken breast").unwrap().substitute, "extra-firm tofu");
        assert_eq!(vegan.rule_for("whole milk").unwrap().substitute, "oat milk");
        assert_eq!(vegan.rule_for("buttermilk").unwrap().term, "buttermilk");
        assert!(ModificationKind::Vegetarian.rule_for("whole milk").is_none());
    }

    #[test]
    fn test_multi_word_terms_win() {
        let rule = ModificationKind::Vegetarian.rule_for("chicken broth").unwrap();
        assert_eq!(rule.substitute, "vegetable broth");
        let rule = ModificationKind::DairyFree.rule_for("cream cheese").unwrap();
        assert_eq!(rule.substitute, "dairy-free cream cheese");
    }

    #[test]
    fn test_substitutions_for_recipe() {
        let ingredients = vec![
            ingredient("spaghetti"),
            ingredient("butter"),
            ingredient("garlic"),
            ingredient("eggs"),
        ];
        let subs = substitutions_for(ModificationKind::Vegan, &ingredients);
        let originals: Vec<&str> = subs.iter().map(|s| s.original.as_str()).collect();
        assert_eq!(originals, vec!["1 cup butter", "1 cup eggs"]);

        let subs = substitutions_for(ModificationKind::LowCarb, &ingredients);
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].substitute, "zucchini noodles");
    }

    #[test]
    fn test_tables_compile_every_rule() {
        assert_eq!(ModificationKind::Healthier.table().len(), HEALTHIER_RULES.len());
        assert_eq!(ModificationKind::Vegetarian.table().len(), MEAT_RULES.len());
        assert_eq!(
            ModificationKind::Vegan.table().len(),
            MEAT_RULES.len() + ANIMAL_PRODUCT_RULES.len()
        );
        assert_eq!(ModificationKind::GlutenFree.table().len(), GLUTEN_RULES.len());
        assert_eq!(ModificationKind::DairyFree.table().len(), DAIRY_RULES.len());
        assert_eq!(ModificationKind::LowCarb.table().len(), LOW_CARB_RULES.len());
    }

    #[test]
    fn test_tables_are_shared_across_calls() {
        let first = ModificationKind::Vegan.table().as_ptr();
        let second = ModificationKind::Vegan.table().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_kind_has_rules() {
        for kind in ModificationKind::ALL {
            assert!(!kind.table().is_empty(), "{kind} has no rules");
        }
    }
}
