use thiserror::Error;

/// Description used for rule names missing from the known table.
pub const GENERIC_RULE_DESCRIPTION: &str = "Regla de negocio del sistema";

const RULE_DESCRIPTIONS: &[(&str, &str)] = &[
    (
        "rule_01_max_age_100_alert",
        "Previene la generación de personas con más de 100 años",
    ),
    (
        "rule_03_pcl_obligatorio",
        "PCL obligatorio para pensiones de invalidez",
    ),
    ("rule_04_inv_sbv_fields", "Campos específicos para INV y SBV"),
    ("rule_05_vejez_fields", "Campos específicos para vejez"),
    (
        "rule_06_civil_status_causante_only",
        "Estado civil solo para causantes",
    ),
    ("rule_07_date_format_yyyy_mm_dd", "Formato de fecha YYYY-MM-DD"),
    (
        "rule_08_51_event_after_birth",
        "Fecha de evento posterior al nacimiento",
    ),
    (
        "rule_09_parent_child_birth_date",
        "Diferencia de edad padre-hijo mínima 12 años",
    ),
    (
        "rule_10_hijo_derecho_max_25_valido",
        "Hijos válidos pierden derecho después de 25 años",
    ),
    (
        "rule_11_sbv_sin_beneficiarios_no_permitido",
        "SBV debe tener beneficiarios",
    ),
    (
        "rule_13_16_normalize_text",
        "Normalización de texto (mayúsculas, sin tildes)",
    ),
    ("rule_17_smlv_range", "Rango de pensión entre 1 y 25 SMLV"),
    (
        "rule_21_22_civil_status_logic",
        "Lógica de estado civil y cónyuge",
    ),
    ("rule_27_mesadas_cutoff_date", "Corte de mesadas por fecha"),
    ("rule_30_id_format", "Formato válido de identificación"),
    (
        "rule_32_doc_type_age_consistency",
        "Consistencia tipo documento y edad",
    ),
    (
        "rule_68_no_same_sex_spouse",
        "Causante y cónyuge de diferente sexo",
    ),
    (
        "rule_70_conyuge_menor_con_hijos_vitalicia",
        "Cónyuge menor con hijos: temporalidad vitalicia",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub enabled: bool,
}

impl Rule {
    pub fn new(name: impl Into<String>, enabled: bool) -> Self {
        Self {
            name: name.into(),
            enabled,
        }
    }
}

/// Aggregate counts as reported by the service on the last full load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl RuleStats {
    pub fn from_rules(rules: &[Rule]) -> Self {
        let active = rules.iter().filter(|rule| rule.enabled).count();
        Self {
            total: rules.len(),
            active,
            inactive: rules.len() - active,
        }
    }

    /// Share of active rules, rounded to the nearest whole percent.
    pub fn active_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.active as f64 / self.total as f64) * 100.0).round() as u32
    }
}

/// One full load: the mapping in service order plus the counts the service reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRules {
    pub rules: Vec<Rule>,
    pub stats: RuleStats,
}

impl LoadedRules {
    /// A load whose counts are derived from the mapping itself.
    pub fn counted(rules: Vec<Rule>) -> Self {
        let stats = RuleStats::from_rules(&rules);
        Self { rules, stats }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule: {0}")]
pub struct UnknownRule(pub String);

/// Local mirror of the remote rule mapping.
///
/// Rules keep the order of the last full load. Stats are only replaced by
/// [`RuleSyncState::replace`], so they can lag behind an optimistic write.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleSyncState {
    rules: Vec<Rule>,
    stats: RuleStats,
    loaded: bool,
}

impl RuleSyncState {
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn stats(&self) -> RuleStats {
        self.stats
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn get(&self, name: &str) -> Option<bool> {
        self.position(name).map(|idx| self.rules[idx].enabled)
    }

    /// Replaces the mapping and stats in one assignment.
    ///
    /// A repeated name keeps its first position and its last value. The
    /// reported stats are stored as given, even when they disagree with the mapping.
    pub fn replace(&mut self, loaded: LoadedRules) {
        let mut rules: Vec<Rule> = Vec::with_capacity(loaded.rules.len());
        for rule in loaded.rules {
            match rules.iter_mut().find(|existing| existing.name == rule.name) {
                Some(existing) => existing.enabled = rule.enabled,
                None => rules.push(rule),
            }
        }
        let stats = loaded.stats;
        *self = Self {
            rules,
            stats,
            loaded: true,
        };
    }

    /// Writes `enabled` ahead of remote confirmation and returns the prior value.
    pub fn apply_optimistic(&mut self, name: &str, enabled: bool) -> Result<bool, UnknownRule> {
        let idx = self
            .position(name)
            .ok_or_else(|| UnknownRule(name.to_string()))?;
        let previous = self.rules[idx].enabled;
        self.rules[idx].enabled = enabled;
        Ok(previous)
    }

    /// Restores a value captured by [`RuleSyncState::apply_optimistic`].
    ///
    /// Returns false when the rule vanished in a reload meanwhile.
    pub fn revert(&mut self, name: &str, previous: bool) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.rules[idx].enabled = previous;
                true
            }
            None => false,
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.name == name)
    }
}

/// Human readable rule name: `rule_07_date_format` becomes `Date Format`.
pub fn format_rule_name(name: &str) -> String {
    let stripped = strip_ordinal_prefix(name).replace('_', " ");
    let mut out = String::with_capacity(stripped.len());
    let mut prev_is_word = false;
    for c in stripped.chars() {
        let is_word = c.is_ascii_alphanumeric() || c == '_';
        if is_word && !prev_is_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        prev_is_word = is_word;
    }
    out
}

pub fn rule_description(name: &str) -> &'static str {
    RULE_DESCRIPTIONS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, description)| *description)
        .unwrap_or(GENERIC_RULE_DESCRIPTION)
}

fn strip_ordinal_prefix(name: &str) -> &str {
    let Some(rest) = name.strip_prefix("rule_") else {
        return name;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return name;
    }
    rest[digits..].strip_prefix('_').unwrap_or(name)
}
