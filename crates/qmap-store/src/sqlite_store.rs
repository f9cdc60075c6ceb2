//! SQLite-backed `EntityStore`
//!
//! Mirrors the rules of `MemoryStore`: the same validation, the same
//! uniqueness and cascade behavior, lists in creation order. Cascading
//! deletes are carried out by the schema's foreign keys.

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use qmap_core::entities::element::ElementUpdate;
use qmap_core::entities::layout::LayoutUpdate;
use qmap_core::entities::model::ModelUpdate;
use qmap_core::entities::position::{NewPosition, PositionUpdate};
use qmap_core::errors::{QmapError, Result};
use qmap_core::ops::validation;
use qmap_core::{Element, EntityStore, Layout, Model, Position};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db;
use crate::errors::{from_rusqlite, is_unique_violation};
use crate::migrations::apply_migrations;

const MODEL_COLUMNS: &str = "id, label, default_layout_id, created_at, updated_at";
const ELEMENT_COLUMNS: &str = "id, label, created_at, updated_at";
const LAYOUT_COLUMNS: &str = "id, label, model_id, created_at, updated_at";
const POSITION_COLUMNS: &str = "id, layout_id, element_id, x, y, created_at, updated_at";

/// Entity store persisted in a SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and bring its schema up to date
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_connection(db::open(path)?)
    }

    /// Fresh in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(db::open_in_memory()?)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for inspection in tests and tooling
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a validated position row
    ///
    /// Another writer on the same database can claim the pair between the
    /// conflict pre-check and this insert; the UNIQUE constraint then
    /// rejects the row and that is reported as `PositionConflict` too.
    fn insert_position(&self, position: &Position) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO positions (id, layout_id, element_id, x, y, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    position.id,
                    position.layout_id,
                    position.element_id,
                    position.x,
                    position.y,
                    to_sql_time(&position.created_at),
                    to_sql_time(&position.updated_at),
                ],
            )
            .map_err(|err| {
                if is_unique_violation(&err) {
                    QmapError::PositionConflict {
                        layout_id: position.layout_id.clone(),
                        element_id: position.element_id.clone(),
                    }
                } else {
                    from_rusqlite(err)
                }
            })?;
        Ok(())
    }

    fn query_list<T>(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt.query_map(params, map).map_err(from_rusqlite)?;
        let items = rows
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(items)
    }

    fn query_one<T>(
        &self,
        sql: &str,
        id: &str,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        self.conn
            .query_row(sql, [id], map)
            .optional()
            .map_err(from_rusqlite)
    }
}

fn new_id() -> String {
    Uuid::now_v7().to_string()
}

fn to_sql_time(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn time_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn model_from_row(row: &Row<'_>) -> rusqlite::Result<Model> {
    Ok(Model {
        id: row.get(0)?,
        label: row.get(1)?,
        default_layout_id: row.get(2)?,
        created_at: time_at(row, 3)?,
        updated_at: time_at(row, 4)?,
    })
}

fn element_from_row(row: &Row<'_>) -> rusqlite::Result<Element> {
    Ok(Element {
        id: row.get(0)?,
        label: row.get(1)?,
        created_at: time_at(row, 2)?,
        updated_at: time_at(row, 3)?,
    })
}

fn layout_from_row(row: &Row<'_>) -> rusqlite::Result<Layout> {
    Ok(Layout {
        id: row.get(0)?,
        label: row.get(1)?,
        model_id: row.get(2)?,
        created_at: time_at(row, 3)?,
        updated_at: time_at(row, 4)?,
    })
}

fn position_from_row(row: &Row<'_>) -> rusqlite::Result<Position> {
    Ok(Position {
        id: row.get(0)?,
        layout_id: row.get(1)?,
        element_id: row.get(2)?,
        x: row.get(3)?,
        y: row.get(4)?,
        created_at: time_at(row, 5)?,
        updated_at: time_at(row, 6)?,
    })
}

fn optional_label(label: Option<&str>) -> Result<Option<String>> {
    label.map(|l| validation::label("label", l)).transpose()
}

impl EntityStore for SqliteStore {
    fn list_models(&self) -> Result<Vec<Model>> {
        self.query_list(
            &format!("SELECT {} FROM models ORDER BY seq", MODEL_COLUMNS),
            [],
            model_from_row,
        )
    }

    fn get_model(&self, id: &str) -> Result<Model> {
        self.query_one(
            &format!("SELECT {} FROM models WHERE id = ?1", MODEL_COLUMNS),
            id,
            model_from_row,
        )?
        .ok_or_else(|| QmapError::ModelNotFound {
            model_id: id.to_string(),
        })
    }

    fn create_model(&mut self, label: &str) -> Result<Model> {
        let model = Model::new(new_id(), validation::label("label", label)?);
        self.conn
            .execute(
                "INSERT INTO models (id, label, default_layout_id, created_at, updated_at)
                 VALUES (?1, ?2, NULL, ?3, ?4)",
                params![
                    model.id,
                    model.label,
                    to_sql_time(&model.created_at),
                    to_sql_time(&model.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(model)
    }

    fn update_model(&mut self, id: &str, update: ModelUpdate) -> Result<Model> {
        let label = optional_label(update.label.as_deref())?;
        let mut model = self.get_model(id)?;
        if let Some(layout_id) = &update.default_layout_id {
            let layout = self.get_layout(layout_id)?;
            if layout.model_id != id {
                return Err(QmapError::DefaultLayoutMismatch {
                    model_id: id.to_string(),
                    layout_id: layout_id.clone(),
                });
            }
        }

        if let Some(label) = label {
            model.label = label;
        }
        if let Some(layout_id) = update.default_layout_id {
            model.default_layout_id = Some(layout_id);
        }
        model.updated_at = Utc::now();

        self.conn
            .execute(
                "UPDATE models SET label = ?2, default_layout_id = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    model.id,
                    model.label,
                    model.default_layout_id,
                    to_sql_time(&model.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(model)
    }

    fn delete_model(&mut self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM models WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(QmapError::ModelNotFound {
                model_id: id.to_string(),
            });
        }
        tracing::debug!(model_id = id, "model deleted with cascade");
        Ok(())
    }

    fn list_elements(&self) -> Result<Vec<Element>> {
        self.query_list(
            &format!("SELECT {} FROM elements ORDER BY seq", ELEMENT_COLUMNS),
            [],
            element_from_row,
        )
    }

    fn get_element(&self, id: &str) -> Result<Element> {
        self.query_one(
            &format!("SELECT {} FROM elements WHERE id = ?1", ELEMENT_COLUMNS),
            id,
            element_from_row,
        )?
        .ok_or_else(|| QmapError::ElementNotFound {
            element_id: id.to_string(),
        })
    }

    fn create_element(&mut self, label: &str) -> Result<Element> {
        let element = Element::new(new_id(), validation::label("label", label)?);
        self.conn
            .execute(
                "INSERT INTO elements (id, label, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                params![
                    element.id,
                    element.label,
                    to_sql_time(&element.created_at),
                    to_sql_time(&element.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(element)
    }

    fn update_element(&mut self, id: &str, update: ElementUpdate) -> Result<Element> {
        let label = optional_label(update.label.as_deref())?;
        let mut element = self.get_element(id)?;
        if let Some(label) = label {
            element.label = label;
        }
        element.updated_at = Utc::now();

        self.conn
            .execute(
                "UPDATE elements SET label = ?2, updated_at = ?3 WHERE id = ?1",
                params![element.id, element.label, to_sql_time(&element.updated_at)],
            )
            .map_err(from_rusqlite)?;
        Ok(element)
    }

    fn delete_element(&mut self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM elements WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(QmapError::ElementNotFound {
                element_id: id.to_string(),
            });
        }
        tracing::debug!(element_id = id, "element deleted");
        Ok(())
    }

    fn list_layouts(&self, model_id: &str) -> Result<Vec<Layout>> {
        self.query_list(
            &format!(
                "SELECT {} FROM layouts WHERE model_id = ?1 ORDER BY seq",
                LAYOUT_COLUMNS
            ),
            [model_id],
            layout_from_row,
        )
    }

    fn get_layout(&self, id: &str) -> Result<Layout> {
        self.query_one(
            &format!("SELECT {} FROM layouts WHERE id = ?1", LAYOUT_COLUMNS),
            id,
            layout_from_row,
        )?
        .ok_or_else(|| QmapError::LayoutNotFound {
            layout_id: id.to_string(),
        })
    }

    fn create_layout(&mut self, label: &str, model_id: &str) -> Result<Layout> {
        let label = validation::label("label", label)?;
        validation::reference("model_id", model_id)?;
        self.get_model(model_id)?;

        let layout = Layout::new(new_id(), label, model_id.to_string());
        self.conn
            .execute(
                "INSERT INTO layouts (id, label, model_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    layout.id,
                    layout.label,
                    layout.model_id,
                    to_sql_time(&layout.created_at),
                    to_sql_time(&layout.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(layout)
    }

    fn update_layout(&mut self, id: &str, update: LayoutUpdate) -> Result<Layout> {
        let label = optional_label(update.label.as_deref())?;
        let mut layout = self.get_layout(id)?;
        if let Some(label) = label {
            layout.label = label;
        }
        layout.updated_at = Utc::now();

        self.conn
            .execute(
                "UPDATE layouts SET label = ?2, updated_at = ?3 WHERE id = ?1",
                params![layout.id, layout.label, to_sql_time(&layout.updated_at)],
            )
            .map_err(from_rusqlite)?;
        Ok(layout)
    }

    fn delete_layout(&mut self, id: &str) -> Result<()> {
        let layout = self.get_layout(id)?;
        let owner = self
            .query_one(
                &format!("SELECT {} FROM models WHERE id = ?1", MODEL_COLUMNS),
                &layout.model_id,
                model_from_row,
            )?;
        if let Some(owner) = owner {
            if owner.default_layout_id.as_deref() == Some(id) {
                return Err(QmapError::DefaultLayoutInUse {
                    layout_id: id.to_string(),
                    model_id: owner.id,
                });
            }
        }

        self.conn
            .execute("DELETE FROM layouts WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        tracing::debug!(layout_id = id, "layout deleted");
        Ok(())
    }

    fn list_positions(&self, layout_id: &str) -> Result<Vec<Position>> {
        self.query_list(
            &format!(
                "SELECT {} FROM positions WHERE layout_id = ?1 ORDER BY seq",
                POSITION_COLUMNS
            ),
            [layout_id],
            position_from_row,
        )
    }

    fn get_position(&self, id: &str) -> Result<Position> {
        self.query_one(
            &format!("SELECT {} FROM positions WHERE id = ?1", POSITION_COLUMNS),
            id,
            position_from_row,
        )?
        .ok_or_else(|| QmapError::PositionNotFound {
            position_id: id.to_string(),
        })
    }

    fn create_position(&mut self, position: NewPosition) -> Result<Position> {
        validation::new_position(&position)?;
        self.get_layout(&position.layout_id)?;
        self.get_element(&position.element_id)?;

        let taken = self
            .conn
            .query_row(
                "SELECT 1 FROM positions WHERE layout_id = ?1 AND element_id = ?2",
                [&position.layout_id, &position.element_id],
                |_| Ok(()),
            )
            .optional()
            .map_err(from_rusqlite)?
            .is_some();
        if taken {
            return Err(QmapError::PositionConflict {
                layout_id: position.layout_id,
                element_id: position.element_id,
            });
        }

        let position = Position::new(new_id(), position);
        self.insert_position(&position)?;
        Ok(position)
    }

    fn update_position(&mut self, id: &str, update: PositionUpdate) -> Result<Position> {
        validation::position_update(&update)?;
        let mut position = self.get_position(id)?;
        if let Some(x) = update.x {
            position.x = x;
        }
        if let Some(y) = update.y {
            position.y = y;
        }
        position.updated_at = Utc::now();

        self.conn
            .execute(
                "UPDATE positions SET x = ?2, y = ?3, updated_at = ?4 WHERE id = ?1",
                params![
                    position.id,
                    position.x,
                    position.y,
                    to_sql_time(&position.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(position)
    }

    fn delete_position(&mut self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM positions WHERE id = ?1", [id])
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(QmapError::PositionNotFound {
                position_id: id.to_string(),
            });
        }
        Ok(())
    }
}
