//! `PostgreSQL` repository implementation for skills.

use super::{
    models::{SkillContentRow, SkillRow},
    schema::skills,
};
use crate::agent::domain::AgentId;
use crate::pagination::{Page, PageRequest};
use crate::persistence::{
    PgPool, column_to_counter, contains_pattern, count_to_total, counter_to_column, page_bounds,
    run_blocking, unique_violation,
};
use crate::skill::{
    domain::{
        PersistedSkillData, Pricing, PricingModel, Skill, SkillCategory, SkillCounter,
        SkillDescription, SkillDraft, SkillEndpoint, SkillFilter, SkillId, SkillMetrics,
        SkillName, SkillTags, SkillVersion,
    },
    ports::{SkillRepository, SkillRepositoryError, SkillRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};

/// `PostgreSQL`-backed skill repository.
#[derive(Debug, Clone)]
pub struct PostgresSkillRepository {
    pool: PgPool,
}

impl PostgresSkillRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> SkillRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> SkillRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking(&self.pool, SkillRepositoryError::from_boxed, f).await
    }
}

#[async_trait]
impl SkillRepository for PostgresSkillRepository {
    async fn create(&self, skill: &Skill) -> SkillRepositoryResult<()> {
        let skill_id = skill.id();
        let agent_id = skill.agent_id();
        let name = skill.name().clone();
        let row = to_content_row(skill)?;

        self.run(move |connection| {
            diesel::insert_into(skills::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match unique_violation(&err) {
                    Some("idx_skills_agent_name") => SkillRepositoryError::DuplicateName {
                        agent_id,
                        name: name.clone(),
                    },
                    Some(_) => SkillRepositoryError::DuplicateSkill(skill_id),
                    None => SkillRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, skill: &Skill) -> SkillRepositoryResult<()> {
        let skill_id = skill.id();
        let row = to_content_row(skill)?;

        self.run(move |connection| {
            let updated_count =
                diesel::update(skills::table.filter(skills::id.eq(skill_id.into_inner())))
                    .set(&row)
                    .execute(connection)
                    .map_err(SkillRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(SkillRepositoryError::NotFound(skill_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: SkillId) -> SkillRepositoryResult<()> {
        self.run(move |connection| {
            let deleted = diesel::delete(skills::table.filter(skills::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(SkillRepositoryError::persistence)?;
            if deleted == 0 {
                return Err(SkillRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: SkillId) -> SkillRepositoryResult<Option<Skill>> {
        self.run(move |connection| {
            let row = skills::table
                .filter(skills::id.eq(id.into_inner()))
                .select(SkillRow::as_select())
                .first::<SkillRow>(connection)
                .optional()
                .map_err(SkillRepositoryError::persistence)?;
            row.map(row_to_skill).transpose()
        })
        .await
    }

    async fn find_by_owner_and_name(
        &self,
        agent_id: AgentId,
        name: &SkillName,
    ) -> SkillRepositoryResult<Option<Skill>> {
        let name_value = name.as_str().to_owned();
        self.run(move |connection| {
            let row = skills::table
                .filter(skills::agent_id.eq(agent_id.into_inner()))
                .filter(skills::name.eq(name_value))
                .select(SkillRow::as_select())
                .first::<SkillRow>(connection)
                .optional()
                .map_err(SkillRepositoryError::persistence)?;
            row.map(row_to_skill).transpose()
        })
        .await
    }

    async fn list_published(
        &self,
        filter: &SkillFilter,
        page: PageRequest,
    ) -> SkillRepositoryResult<Page<Skill>> {
        let filter_owned = filter.clone();
        let (limit, offset) = page_bounds(page);

        self.run(move |connection| {
            let total: i64 = published_query(&filter_owned)
                .count()
                .get_result(connection)
                .map_err(SkillRepositoryError::persistence)?;
            let rows = published_query(&filter_owned)
                .order(skills::created_at.desc())
                .limit(limit)
                .offset(offset)
                .select(SkillRow::as_select())
                .load::<SkillRow>(connection)
                .map_err(SkillRepositoryError::persistence)?;
            let items = rows
                .into_iter()
                .map(row_to_skill)
                .collect::<SkillRepositoryResult<Vec<_>>>()?;
            Ok(Page::new(items, count_to_total(total), page))
        })
        .await
    }

    async fn list_by_owner(&self, agent_id: AgentId) -> SkillRepositoryResult<Vec<Skill>> {
        self.run(move |connection| {
            let rows = skills::table
                .filter(skills::agent_id.eq(agent_id.into_inner()))
                .order(skills::created_at.desc())
                .select(SkillRow::as_select())
                .load::<SkillRow>(connection)
                .map_err(SkillRepositoryError::persistence)?;
            rows.into_iter().map(row_to_skill).collect()
        })
        .await
    }

    async fn increment(&self, id: SkillId, counter: SkillCounter) -> SkillRepositoryResult<()> {
        self.run(move |connection| {
            let target = skills::table.filter(skills::id.eq(id.into_inner()));
            let updated_count = match counter {
                SkillCounter::Use => diesel::update(target)
                    .set(skills::use_count.eq(skills::use_count + 1))
                    .execute(connection),
                SkillCounter::Download => diesel::update(target)
                    .set(skills::download_count.eq(skills::download_count + 1))
                    .execute(connection),
            }
            .map_err(SkillRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(SkillRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn set_rating(
        &self,
        id: SkillId,
        rating: f64,
        review_count: u32,
    ) -> SkillRepositoryResult<()> {
        let count = counter_to_column(review_count);
        self.run(move |connection| {
            let updated_count =
                diesel::update(skills::table.filter(skills::id.eq(id.into_inner())))
                    .set((skills::rating.eq(rating), skills::review_count.eq(count)))
                    .execute(connection)
                    .map_err(SkillRepositoryError::persistence)?;
            if updated_count == 0 {
                return Err(SkillRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn published_query(filter: &SkillFilter) -> skills::BoxedQuery<'static, Pg> {
    let mut query = skills::table
        .filter(skills::is_published.eq(true))
        .into_boxed();
    if let Some(category) = filter.category {
        query = query.filter(skills::category.eq(category.as_str()));
    }
    if let Some(needle) = filter.search.as_deref() {
        let pattern = contains_pattern(needle);
        let tag_match = sql::<Bool>(concat!(
            "EXISTS (SELECT 1 FROM jsonb_array_elements_text(tags) AS tag ",
            "WHERE lower(tag) = lower(",
        ))
        .bind::<Text, _>(needle.to_owned())
        .sql("))");
        query = query.filter(
            skills::name
                .ilike(pattern.clone())
                .or(skills::description.ilike(pattern))
                .or(tag_match),
        );
    }
    query
}

fn to_content_row(skill: &Skill) -> SkillRepositoryResult<SkillContentRow> {
    let pricing = skill.pricing();
    Ok(SkillContentRow {
        id: skill.id().into_inner(),
        agent_id: skill.agent_id().into_inner(),
        name: skill.name().as_str().to_owned(),
        version: skill.version().as_str().to_owned(),
        description: skill.description().as_str().to_owned(),
        category: skill.category().as_str().to_owned(),
        tags: serde_json::to_value(skill.tags()).map_err(SkillRepositoryError::persistence)?,
        api_endpoint: skill.api_endpoint().map(str::to_owned),
        repo_url: skill.repo_url().map(str::to_owned),
        documentation: skill.documentation().map(str::to_owned),
        price_cents: i64::try_from(pricing.price_cents())
            .map_err(SkillRepositoryError::persistence)?,
        currency: pricing.currency().to_owned(),
        pricing_model: serde_json::to_value(pricing.model())
            .map_err(SkillRepositoryError::persistence)?,
        endpoints: serde_json::to_value(skill.endpoints())
            .map_err(SkillRepositoryError::persistence)?,
        is_published: skill.is_published(),
        created_at: skill.created_at(),
        updated_at: skill.updated_at(),
    })
}

fn row_to_skill(row: SkillRow) -> SkillRepositoryResult<Skill> {
    let SkillRow {
        id,
        agent_id,
        name,
        version,
        description,
        category,
        tags,
        api_endpoint,
        repo_url,
        documentation,
        price_cents,
        currency,
        pricing_model,
        endpoints,
        is_published,
        rating,
        review_count,
        use_count,
        download_count,
        created_at,
        updated_at,
    } = row;

    let tag_list: Vec<String> =
        serde_json::from_value(tags).map_err(SkillRepositoryError::invalid_persisted_data)?;
    let model: PricingModel = serde_json::from_value(pricing_model)
        .map_err(SkillRepositoryError::invalid_persisted_data)?;
    let endpoint_list: Vec<SkillEndpoint> =
        serde_json::from_value(endpoints).map_err(SkillRepositoryError::invalid_persisted_data)?;
    let price = u64::try_from(price_cents).map_err(SkillRepositoryError::invalid_persisted_data)?;

    let draft = SkillDraft::new(
        SkillName::new(&name).map_err(SkillRepositoryError::invalid_persisted_data)?,
        SkillDescription::new(&description)
            .map_err(SkillRepositoryError::invalid_persisted_data)?,
        SkillCategory::try_from(category.as_str())
            .map_err(SkillRepositoryError::invalid_persisted_data)?,
    )
    .with_version(
        SkillVersion::new(&version).map_err(SkillRepositoryError::invalid_persisted_data)?,
    )
    .with_tags(SkillTags::new(tag_list).map_err(SkillRepositoryError::invalid_persisted_data)?)
    .with_links(api_endpoint, repo_url)
    .map_err(SkillRepositoryError::invalid_persisted_data)?
    .with_documentation(documentation)
    .with_pricing(
        Pricing::new(price, Some(currency), model)
            .map_err(SkillRepositoryError::invalid_persisted_data)?,
    );

    Ok(Skill::from_persisted(PersistedSkillData {
        id: SkillId::from_uuid(id),
        agent_id: AgentId::from_uuid(agent_id),
        draft,
        endpoints: endpoint_list,
        is_published,
        metrics: SkillMetrics {
            rating,
            review_count: column_to_counter(review_count),
            use_count: column_to_counter(use_count),
            download_count: column_to_counter(download_count),
        },
        created_at,
        updated_at,
    }))
}
