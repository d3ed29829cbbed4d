use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create slots table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS slots (
            id UUID PRIMARY KEY,
            provider_id UUID NOT NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            duration_minutes INTEGER NOT NULL DEFAULT 50,
            is_booked BOOLEAN NOT NULL DEFAULT FALSE,
            booked_by UUID NULL,
            booking_kind VARCHAR(16) NULL,
            version INTEGER NOT NULL DEFAULT 1,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration_minutes > 0),
            CONSTRAINT unique_provider_instant UNIQUE (provider_id, start_time)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_slots_provider_id ON slots(provider_id);
        CREATE INDEX IF NOT EXISTS idx_slots_start_time ON slots(start_time);
        CREATE INDEX IF NOT EXISTS idx_slots_free
            ON slots(provider_id, start_time) WHERE is_booked = FALSE;
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}
