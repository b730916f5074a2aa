use sqlx::{Encode, PgPool, Postgres, QueryBuilder, Type};
use uuid::Uuid;

#[derive(Clone)]
pub struct SqlxBlogPostRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxCategoryRepo {
    pub pool: PgPool,
}

#[derive(Clone)]
pub struct SqlxProjectRepo {
    pub pool: PgPool,
}

/// Builds `UPDATE <table> SET ... WHERE id = $n` from the columns that changed.
pub(crate) struct UpdateBuilder<'a> {
    builder: QueryBuilder<'a, Postgres>,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(table: &str) -> Self {
        UpdateBuilder {
            builder: QueryBuilder::new(format!("UPDATE {table} SET updated_at = NOW()")),
        }
    }

    /// Adds `column = value` when `value` is `Some`. Nullable columns pass `Option<Option<T>>`.
    pub fn set<T>(&mut self, column: &str, value: Option<T>) -> &mut Self
    where
        T: 'a + Encode<'a, Postgres> + Type<Postgres>,
    {
        if let Some(value) = value {
            self.builder.push(", ").push(column).push(" = ").push_bind(value);
        }
        self
    }

    /// Targets one live row and returns its id.
    pub fn finish(mut self, id: Uuid, soft_deletable: bool) -> QueryBuilder<'a, Postgres> {
        self.builder.push(" WHERE id = ").push_bind(id);
        if soft_deletable {
            self.builder.push(" AND deleted_at IS NULL");
        }
        self.builder.push(" RETURNING id");
        self.builder
    }
}

/// Name of the violated constraint, if the error is a database constraint error.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}
