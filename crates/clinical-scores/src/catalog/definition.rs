use serde::Serialize;
use serde_json::Value;

/// Medical specialty a score is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreCategory {
    Cardiology,
    Nephrology,
    Pulmonology,
}

impl ScoreCategory {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreCategory::Cardiology => "cardiology",
            ScoreCategory::Nephrology => "nephrology",
            ScoreCategory::Pulmonology => "pulmonology",
        }
    }
}

/// Algorithm family a score function belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreShape {
    /// Independent factors each adding fixed points.
    WeightedSum,
    /// Later questions depend on earlier branch outcomes.
    DecisionTree,
    /// Closed-form equation over continuous inputs.
    Formula,
    /// Biomarker pair compared against fixed cutoffs.
    Staging,
    /// Counting of major/minor diagnostic criteria.
    Criteria,
}

impl ScoreShape {
    /// Whether turning a present/absent factor on can only raise the result.
    pub fn is_additive(&self) -> bool {
        matches!(self, ScoreShape::WeightedSum | ScoreShape::Criteria)
    }
}

/// Declared type and constraint of one input field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputKind {
    /// Whole number within inclusive bounds.
    Integer { min: i64, max: i64 },
    /// Real number within inclusive bounds.
    Number { min: f64, max: f64 },
    /// One of a closed set of strings.
    Choice { options: &'static [&'static str] },
    /// Present/absent; accepts booleans or `"yes"`/`"no"`.
    Flag,
}

impl InputKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            InputKind::Integer { .. } => "integer",
            InputKind::Number { .. } => "number",
            InputKind::Choice { .. } => "choice",
            InputKind::Flag => "flag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: InputKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<&'static str>,
    pub description: &'static str,
}

impl InputField {
    pub fn integer(name: &'static str, min: i64, max: i64) -> Self {
        Self::new(name, InputKind::Integer { min, max })
    }

    pub fn number(name: &'static str, min: f64, max: f64) -> Self {
        Self::new(name, InputKind::Number { min, max })
    }

    pub fn choice(name: &'static str, options: &'static [&'static str]) -> Self {
        Self::new(name, InputKind::Choice { options })
    }

    pub fn flag(name: &'static str) -> Self {
        Self::new(name, InputKind::Flag)
    }

    fn new(name: &'static str, kind: InputKind) -> Self {
        Self {
            name,
            kind,
            unit: None,
            description: "",
        }
    }

    pub fn unit(mut self, unit: &'static str) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Declared JSON shape of one output field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    Integer,
    Number,
    /// Non-empty string drawn from a small set (e.g. "Stage II").
    Label,
    Text,
    Map,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputField {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: OutputKind,
    pub description: &'static str,
}

/// Names every output record carries regardless of score.
pub const CORE_OUTPUTS: [&str; 5] = [
    "result",
    "unit",
    "interpretation",
    "stage",
    "stage_description",
];

/// One row of a score's interpretation table; bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageBand {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub stage: &'static str,
    pub description: &'static str,
}

impl StageBand {
    pub const fn new(
        min: Option<f64>,
        max: Option<f64>,
        stage: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            min,
            max,
            stage,
            description,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// First band containing `value`. Intended for integer-valued totals whose
/// bands tile the range without gaps.
pub fn band_for(bands: &'static [StageBand], value: f64) -> Option<&'static StageBand> {
    bands.iter().find(|band| band.contains(value))
}

/// Short catalog entry used by listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreInfo {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: ScoreCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
}

/// Declarative schema of one score: its inputs, its output envelope and
/// the catalog metadata served alongside it.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreDefinition {
    pub id: &'static str,
    pub title: &'static str,
    pub category: ScoreCategory,
    pub shape: ScoreShape,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
    pub formula: &'static str,
    pub references: Vec<&'static str>,
    pub notes: Vec<&'static str>,
    pub input_fields: Vec<InputField>,
    pub output_fields: Vec<OutputField>,
    pub interpretation: &'static [StageBand],
    pub example: Value,
}

impl ScoreDefinition {
    /// Start a definition whose `result` has the given kind. The remaining
    /// core outputs are declared automatically.
    pub fn new(
        id: &'static str,
        title: &'static str,
        category: ScoreCategory,
        shape: ScoreShape,
        result: OutputKind,
    ) -> Self {
        let output_fields = vec![
            OutputField {
                name: "result",
                kind: result,
                description: "Primary score result",
            },
            OutputField {
                name: "unit",
                kind: OutputKind::Text,
                description: "Unit of the result",
            },
            OutputField {
                name: "interpretation",
                kind: OutputKind::Text,
                description: "Clinical meaning and recommended next step",
            },
            OutputField {
                name: "stage",
                kind: OutputKind::Label,
                description: "Risk category label",
            },
            OutputField {
                name: "stage_description",
                kind: OutputKind::Text,
                description: "Description of the risk category",
            },
        ];

        Self {
            id,
            title,
            category,
            shape,
            description: "",
            version: None,
            formula: "",
            references: Vec::new(),
            notes: Vec::new(),
            input_fields: Vec::new(),
            output_fields,
            interpretation: &[],
            example: Value::Null,
        }
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn version(mut self, version: &'static str) -> Self {
        self.version = Some(version);
        self
    }

    pub fn formula(mut self, formula: &'static str) -> Self {
        self.formula = formula;
        self
    }

    pub fn reference(mut self, citation: &'static str) -> Self {
        self.references.push(citation);
        self
    }

    pub fn note(mut self, note: &'static str) -> Self {
        self.notes.push(note);
        self
    }

    pub fn input(mut self, field: InputField) -> Self {
        self.input_fields.push(field);
        self
    }

    /// Declare an auxiliary output carried next to the core fields.
    pub fn extra(mut self, name: &'static str, kind: OutputKind, description: &'static str) -> Self {
        self.output_fields.push(OutputField {
            name,
            kind,
            description,
        });
        self
    }

    pub fn bands(mut self, bands: &'static [StageBand]) -> Self {
        self.interpretation = bands;
        self
    }

    pub fn example(mut self, example: Value) -> Self {
        self.example = example;
        self
    }

    pub fn input_field(&self, name: &str) -> Option<&InputField> {
        self.input_fields.iter().find(|field| field.name == name)
    }

    pub fn output_field(&self, name: &str) -> Option<&OutputField> {
        self.output_fields.iter().find(|field| field.name == name)
    }

    /// Position of `stage` in the interpretation table, lowest risk first.
    pub fn stage_rank(&self, stage: &str) -> Option<usize> {
        self.interpretation
            .iter()
            .position(|band| band.stage == stage)
    }

    pub fn info(&self) -> ScoreInfo {
        ScoreInfo {
            id: self.id,
            title: self.title,
            description: self.description,
            category: self.category,
            version: self.version,
        }
    }

    /// Case-insensitive substring match over id, title, description and category.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.id,
            self.title,
            self.description,
            self.category.label(),
        ]
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
    }

    /// Structural problems that make the definition unusable.
    pub(crate) fn defects(&self) -> Vec<String> {
        let mut defects = Vec::new();

        if self.id.trim().is_empty() {
            defects.push("id must not be empty".to_string());
        }

        for (index, field) in self.input_fields.iter().enumerate() {
            if self.input_fields[..index]
                .iter()
                .any(|earlier| earlier.name == field.name)
            {
                defects.push(format!("input field '{}' declared twice", field.name));
            }
            match &field.kind {
                InputKind::Integer { min, max } if min > max => {
                    defects.push(format!("input field '{}' has min > max", field.name));
                }
                InputKind::Number { min, max } if !(min <= max) => {
                    defects.push(format!("input field '{}' has min > max", field.name));
                }
                InputKind::Choice { options } if options.is_empty() => {
                    defects.push(format!("input field '{}' has no options", field.name));
                }
                _ => {}
            }
        }

        for (index, field) in self.output_fields.iter().enumerate() {
            if self.output_fields[..index]
                .iter()
                .any(|earlier| earlier.name == field.name)
            {
                defects.push(format!("output field '{}' declared twice", field.name));
            }
        }
        for core in CORE_OUTPUTS {
            if self.output_field(core).is_none() {
                defects.push(format!("core output '{core}' is not declared"));
            }
        }

        defects
    }
}
