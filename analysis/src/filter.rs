//! Column filters over the parser tables.
//!
//! A [`Filters`] set maps a column name to a list of accepted values. Boolean
//! and text columns keep the rows whose value is contained in the list, numeric
//! columns take a list of comparisons like `">=5"` that all have to hold.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Bool,
    Text,
    Number,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Bool(bool),
    Text(Option<&'a str>),
    Number(Option<f64>),
}

pub trait ColumnValue {
    const KIND: ColumnKind;

    fn value(&self) -> Value<'_>;
}

impl ColumnValue for bool {
    const KIND: ColumnKind = ColumnKind::Bool;

    fn value(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

impl ColumnValue for String {
    const KIND: ColumnKind = ColumnKind::Text;

    fn value(&self) -> Value<'_> {
        Value::Text(Some(self.as_str()))
    }
}

impl ColumnValue for Option<String> {
    const KIND: ColumnKind = ColumnKind::Text;

    fn value(&self) -> Value<'_> {
        Value::Text(self.as_deref())
    }
}

impl ColumnValue for u32 {
    const KIND: ColumnKind = ColumnKind::Number;

    fn value(&self) -> Value<'_> {
        Value::Number(Some(f64::from(*self)))
    }
}

impl ColumnValue for i64 {
    const KIND: ColumnKind = ColumnKind::Number;

    fn value(&self) -> Value<'_> {
        Value::Number(Some(*self as f64))
    }
}

impl ColumnValue for f64 {
    const KIND: ColumnKind = ColumnKind::Number;

    fn value(&self) -> Value<'_> {
        Value::Number(Some(*self))
    }
}

impl ColumnValue for Option<f64> {
    const KIND: ColumnKind = ColumnKind::Number;

    fn value(&self) -> Value<'_> {
        Value::Number(*self)
    }
}

/// A row type whose fields can be addressed by their column name.
pub trait Columns {
    fn kind(column: &str) -> Option<ColumnKind>;

    fn value(&self, column: &str) -> Option<Value<'_>>;
}

/// Implements [`Columns`] for a row struct from a `"columnName" => field: Type` list.
macro_rules! columns {
    ($row:ty { $($name:literal => $field:ident: $ty:ty),* $(,)? }) => {
        impl $crate::filter::Columns for $row {
            fn kind(column: &str) -> Option<$crate::filter::ColumnKind> {
                match column {
                    $($name => Some(<$ty as $crate::filter::ColumnValue>::KIND),)*
                    _ => None,
                }
            }

            fn value(&self, column: &str) -> Option<$crate::filter::Value<'_>> {
                match column {
                    $($name => Some(<$ty as $crate::filter::ColumnValue>::value(&self.$field)),)*
                    _ => None,
                }
            }
        }
    };
}
pub(crate) use columns;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Text(String),
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("Unknown column \"{column}\" in filters")]
    UnknownColumn { column: String },
    #[error("Filter(s) for column \"{column}\" must be of type boolean")]
    ExpectedBool { column: String },
    #[error("Filter(s) for column \"{column}\" must be of type string")]
    ExpectedText { column: String },
    #[error("Invalid logical operator in filters for \"{column}\" column")]
    InvalidOperator { column: String },
    #[error("Invalid numerical value in filters for \"{column}\" column")]
    InvalidNumber { column: String },
    #[error("Malformed filter expression \"{expr}\", expected column=value[,value]")]
    Malformed { expr: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl Comparison {
    fn from_sign(sign: &str) -> Option<Self> {
        match sign {
            "==" => Some(Self::Eq),
            "!=" => Some(Self::Ne),
            "<=" => Some(Self::Le),
            ">=" => Some(Self::Ge),
            "<" => Some(Self::Lt),
            ">" => Some(Self::Gt),
            _ => None,
        }
    }

    fn holds(self, lhs: Option<f64>, rhs: f64) -> bool {
        // A missing value only satisfies "!="
        let lhs = match lhs {
            Some(v) => v,
            None => return self == Self::Ne,
        };

        match self {
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            Self::Le => lhs <= rhs,
            Self::Ge => lhs >= rhs,
            Self::Lt => lhs < rhs,
            Self::Gt => lhs > rhs,
        }
    }
}

/// Splits `">=12.5"` into its operator and number.
pub fn parse_comparison(column: &str, raw: &str) -> Result<(Comparison, f64), FilterError> {
    let split = raw
        .char_indices()
        .find(|(_, c)| c.is_ascii_digit())
        .map(|(idx, _)| idx)
        .unwrap_or(raw.len());
    let (sign, number) = raw.split_at(split);

    let comparison = Comparison::from_sign(sign).ok_or_else(|| FilterError::InvalidOperator {
        column: column.to_owned(),
    })?;
    let number = number.parse::<f64>().map_err(|_| FilterError::InvalidNumber {
        column: column.to_owned(),
    })?;

    Ok((comparison, number))
}

enum Predicate<'f> {
    Bools(Vec<bool>),
    Texts(Vec<&'f str>),
    Compare(Vec<(Comparison, f64)>),
}

impl Predicate<'_> {
    fn matches(&self, value: Value<'_>) -> bool {
        match (self, value) {
            (Self::Bools(accepted), Value::Bool(v)) => accepted.contains(&v),
            (Self::Texts(accepted), Value::Text(Some(v))) => accepted.contains(&v),
            (Self::Texts(_), Value::Text(None)) => false,
            (Self::Compare(conditions), Value::Number(v)) => {
                conditions.iter().all(|(cmp, rhs)| cmp.holds(v, *rhs))
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Filters {
    columns: Vec<(String, Vec<FilterValue>)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Sets the accepted values for a column, replacing any previous entry.
    pub fn insert<C, I, V>(&mut self, column: C, values: I)
    where
        C: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        let column = column.into();
        let values: Vec<FilterValue> = values.into_iter().map(Into::into).collect();

        match self.columns.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = values,
            None => self.columns.push((column, values)),
        }
    }

    pub fn with<C, I, V>(mut self, column: C, values: I) -> Self
    where
        C: Into<String>,
        I: IntoIterator<Item = V>,
        V: Into<FilterValue>,
    {
        self.insert(column, values);
        self
    }

    /// Adds a filter from its command line form `column=value[,value]`.
    ///
    /// `true`/`false` become boolean values, everything else stays text so that
    /// numeric comparisons like `roundNum=>=16` keep working.
    pub fn insert_expr(&mut self, expr: &str) -> Result<(), FilterError> {
        let (column, values) = expr.split_once('=').ok_or_else(|| FilterError::Malformed {
            expr: expr.to_owned(),
        })?;
        if column.is_empty() || values.is_empty() {
            return Err(FilterError::Malformed {
                expr: expr.to_owned(),
            });
        }

        let values = values.split(',').map(|v| match v {
            "true" => FilterValue::Bool(true),
            "false" => FilterValue::Bool(false),
            other => FilterValue::Text(other.to_owned()),
        });
        self.insert(column, values);

        Ok(())
    }

    fn compile<R: Columns>(&self) -> Result<Vec<(&str, Predicate<'_>)>, FilterError> {
        self.columns
            .iter()
            .map(|(column, values)| {
                let kind = R::kind(column).ok_or_else(|| FilterError::UnknownColumn {
                    column: column.clone(),
                })?;

                let predicate = match kind {
                    ColumnKind::Bool => Predicate::Bools(
                        values
                            .iter()
                            .map(|v| match v {
                                FilterValue::Bool(b) => Ok(*b),
                                FilterValue::Text(_) => Err(FilterError::ExpectedBool {
                                    column: column.clone(),
                                }),
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                    ColumnKind::Text => Predicate::Texts(
                        values
                            .iter()
                            .map(|v| match v {
                                FilterValue::Text(t) => Ok(t.as_str()),
                                FilterValue::Bool(_) => Err(FilterError::ExpectedText {
                                    column: column.clone(),
                                }),
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                    ColumnKind::Number => Predicate::Compare(
                        values
                            .iter()
                            .map(|v| match v {
                                FilterValue::Text(t) => parse_comparison(column, t),
                                FilterValue::Bool(_) => Err(FilterError::ExpectedText {
                                    column: column.clone(),
                                }),
                            })
                            .collect::<Result<_, _>>()?,
                    ),
                };

                Ok((column.as_str(), predicate))
            })
            .collect()
    }

    /// Returns the rows passing every column filter.
    ///
    /// The filters are validated against the row type first, so an invalid
    /// filter fails even when there are no rows.
    pub fn apply<'r, R, I>(&self, rows: I) -> Result<Vec<&'r R>, FilterError>
    where
        R: Columns + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let predicates = self.compile::<R>()?;

        Ok(rows
            .into_iter()
            .filter(|row| {
                predicates.iter().all(|(column, predicate)| {
                    row.value(column)
                        .map(|value| predicate.matches(value))
                        .unwrap_or(false)
                })
            })
            .collect())
    }
}

/// One filter set per table an aggregation reads from.
///
/// `kill` applies to kill counts, `death` to death counts even though both
/// read the kill table.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StatFilters {
    pub damage: Filters,
    pub flash: Filters,
    pub grenade: Filters,
    pub kill: Filters,
    pub death: Filters,
    pub round: Filters,
    pub weapon_fire: Filters,
    pub bomb: Filters,
}

impl StatFilters {
    /// Routes a `table:column=value` expression to the matching filter set.
    pub fn insert_expr(&mut self, expr: &str) -> Result<(), FilterError> {
        let (table, filter) = expr.split_once(':').ok_or_else(|| FilterError::Malformed {
            expr: expr.to_owned(),
        })?;

        let filters = match table {
            "damage" | "damages" => &mut self.damage,
            "flash" | "flashes" => &mut self.flash,
            "grenade" | "grenades" => &mut self.grenade,
            "kill" | "kills" => &mut self.kill,
            "death" | "deaths" => &mut self.death,
            "round" | "rounds" => &mut self.round,
            "weapon_fire" | "weapon_fires" => &mut self.weapon_fire,
            "bomb" | "bombs" => &mut self.bomb,
            _ => {
                return Err(FilterError::Malformed {
                    expr: expr.to_owned(),
                })
            }
        };

        filters.insert_expr(filter)
    }
}
