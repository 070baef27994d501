use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::AnalysisResult;

#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn save(&self, analysis: &AnalysisResult) -> anyhow::Result<()>;
    async fn get(&self, id: Uuid) -> anyhow::Result<Option<AnalysisResult>>;
    async fn list(&self) -> anyhow::Result<Vec<AnalysisResult>>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn clear(&self) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<Uuid, AnalysisResult>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryStore {
    async fn save(&self, analysis: &AnalysisResult) -> anyhow::Result<()> {
        self.records
            .write()
            .await
            .insert(analysis.id, analysis.clone());
        Ok(())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<AnalysisResult>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> anyhow::Result<Vec<AnalysisResult>> {
        let mut records: Vec<AnalysisResult> =
            self.records.read().await.values().cloned().collect();
        // Map iteration order is unspecified; keep listings stable.
        records.sort_by(|a, b| {
            a.analysis_date
                .cmp(&b.analysis_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        self.records.write().await.clear();
        Ok(())
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl AnalysisStore for PgStore {
    async fn save(&self, analysis: &AnalysisResult) -> anyhow::Result<()> {
        let record = serde_json::to_value(analysis).context("failed to serialize analysis")?;
        sqlx::query(
            r#"
            INSERT INTO agency_signals.analyses (id, account_name, analysis_date, record)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET account_name = EXCLUDED.account_name,
                analysis_date = EXCLUDED.analysis_date,
                record = EXCLUDED.record
            "#,
        )
        .bind(analysis.id)
        .bind(&analysis.account_name)
        .bind(analysis.analysis_date)
        .bind(record)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<AnalysisResult>> {
        let row = sqlx::query("SELECT record FROM agency_signals.analyses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let record: serde_json::Value = row.get("record");
                let analysis =
                    serde_json::from_value(record).context("failed to decode stored analysis")?;
                Ok(Some(analysis))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> anyhow::Result<Vec<AnalysisResult>> {
        let rows =
            sqlx::query("SELECT record FROM agency_signals.analyses ORDER BY analysis_date, id")
                .fetch_all(&self.pool)
                .await?;

        let mut analyses = Vec::with_capacity(rows.len());
        for row in rows {
            let record: serde_json::Value = row.get("record");
            analyses
                .push(serde_json::from_value(record).context("failed to decode stored analysis")?);
        }
        Ok(analyses)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM agency_signals.analyses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM agency_signals.analyses")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use chrono::{TimeZone, Utc};

    fn record(name: &str, minute: u32) -> AnalysisResult {
        let signal = SignalResult {
            level: SignalLevel::Low,
            score: 0,
            explanation: "quiet".to_string(),
            factors: vec![],
            recommendations: vec![],
        };
        AnalysisResult {
            id: Uuid::new_v4(),
            account_name: name.to_string(),
            analysis_date: Utc.with_ymd_and_hms(2026, 3, 5, 9, minute, 0).unwrap(),
            retainer_reality_signal: signal.clone(),
            delivery_drift_signal: signal.clone(),
            client_risk_signal: signal,
            overall_assessment: OverallAssessment {
                level: SignalLevel::Low,
                summary: "healthy".to_string(),
                key_findings: vec![],
                priority_actions: vec![],
            },
            markdown_report: format!("# Account Diagnostic Report: {name}\n"),
        }
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let store = MemoryStore::new();
        let analysis = record("Northwind Media", 0);

        store.save(&analysis).await.unwrap();
        let fetched = store.get(analysis.id).await.unwrap().unwrap();
        assert_eq!(fetched, analysis);
    }

    #[tokio::test]
    async fn get_unknown_id_is_none_not_an_error() {
        let store = MemoryStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_same_id_overwrites() {
        let store = MemoryStore::new();
        let mut analysis = record("Northwind Media", 0);
        store.save(&analysis).await.unwrap();

        analysis.account_name = "Northwind Media (renamed)".to_string();
        store.save(&analysis).await.unwrap();

        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].account_name, "Northwind Media (renamed)");
    }

    #[tokio::test]
    async fn list_is_ordered_by_analysis_date() {
        let store = MemoryStore::new();
        let later = record("Later", 30);
        let earlier = record("Earlier", 10);
        store.save(&later).await.unwrap();
        store.save(&earlier).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.account_name)
            .collect();
        assert_eq!(names, vec!["Earlier", "Later"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_record_was_removed() {
        let store = MemoryStore::new();
        let analysis = record("Northwind Media", 0);
        store.save(&analysis).await.unwrap();

        assert!(store.delete(analysis.id).await.unwrap());
        assert!(!store.delete(analysis.id).await.unwrap());
        assert!(store.get(analysis.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_empties_the_store() {
        let store = MemoryStore::new();
        store.save(&record("A", 0)).await.unwrap();
        store.save(&record("B", 1)).await.unwrap();

        store.clear().await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }
}
