use crate::libs::rule::Rule;
use anyhow::Result;
use rusqlite::{params, Connection};

const INSERT_RULE: &str = "INSERT INTO rules (pattern, project_id, task_id) VALUES (?1, ?2, ?3)";
const SELECT_RULES: &str = "SELECT r.id, r.pattern, r.project_id, p.name, r.task_id, t.name
    FROM rules r
    JOIN projects p ON r.project_id = p.id
    LEFT JOIN tasks t ON r.task_id = t.id
    ORDER BY r.id ASC";

pub struct Rules<'a> {
    conn: &'a Connection,
}

impl<'a> Rules<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, pattern: &str, project_id: i64, task_id: Option<i64>) -> Result<i64> {
        self.conn.execute(INSERT_RULE, params![pattern, project_id, task_id])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All rules in definition order.
    pub fn fetch(&self) -> Result<Vec<Rule>> {
        let mut stmt = self.conn.prepare(SELECT_RULES)?;
        let rules = stmt
            .query_map([], |row| {
                Ok(Rule {
                    id: row.get(0)?,
                    pattern: row.get(1)?,
                    project_id: row.get(2)?,
                    project_name: row.get(3)?,
                    task_id: row.get(4)?,
                    task_name: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rules)
    }
}
