//! Demo listings owned by the seeded administrator.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::db::{MemoryStore, Stored};
use crate::errors::AppError;
use crate::models::user::{
    Owner, User, UserRole, DEMO_ADMIN_EMAIL, DEMO_ADMIN_ID, DEMO_ADMIN_NAME, DEMO_ADMIN_PASSWORD,
};
use crate::models::{
    Campaign, CampaignStatus, CreateCampaign, CreateItem, CreateJob, Item, ItemStatus, Job,
    JobStatus, Listing,
};
use crate::services::auth::hash_password;

/// Listing types that ship with demo data.
pub trait DemoData: Listing {
    /// Drafts paired with their posting time.
    fn demo_drafts() -> Vec<(Self::Draft, DateTime<Utc>)>;

    /// Title or name a demo listing is recognised by.
    fn title(&self) -> &str;

    fn draft_title(draft: &Self::Draft) -> &str;

    /// Demo drafts whose title does not appear in `existing`.
    fn missing_drafts(existing: &[Self]) -> Vec<Self::Draft> {
        Self::demo_drafts()
            .into_iter()
            .map(|(draft, _)| draft)
            .filter(|draft| {
                !existing
                    .iter()
                    .any(|listing| listing.title() == Self::draft_title(draft))
            })
            .collect()
    }

    fn demo_rows(owner: &Owner) -> Vec<Self> {
        Self::demo_drafts()
            .into_iter()
            .map(|(draft, posted)| Self::from_draft(draft, Uuid::now_v7(), owner, posted))
            .collect()
    }
}

/// Owner reference of the seeded administrator.
pub fn demo_owner() -> Owner {
    Owner {
        id: DEMO_ADMIN_ID,
        name: Some(DEMO_ADMIN_NAME.to_string()),
    }
}

/// Seed the administrator and every demo listing. Does nothing when the
/// administrator already exists.
pub async fn seed(store: &MemoryStore) -> Result<(), AppError> {
    if store.users.find_by_email(DEMO_ADMIN_EMAIL).await.is_some() {
        tracing::info!("Demo data already present");
        return Ok(());
    }

    let admin = User {
        id: DEMO_ADMIN_ID,
        name: DEMO_ADMIN_NAME.to_string(),
        email: DEMO_ADMIN_EMAIL.to_string(),
        password_hash: hash_password(DEMO_ADMIN_PASSWORD)?,
        role: UserRole::Admin,
        created_at: Utc::now(),
    };
    let owner = admin.owner();
    store.users.insert(admin).await?;

    let items = seed_table::<Item>(store, &owner).await;
    let jobs = seed_table::<Job>(store, &owner).await;
    let campaigns = seed_table::<Campaign>(store, &owner).await;
    tracing::info!(items, jobs, campaigns, "Demo data seeded");
    Ok(())
}

async fn seed_table<L: DemoData + Stored>(store: &MemoryStore, owner: &Owner) -> usize {
    let rows = L::demo_rows(owner);
    let count = rows.len();
    for row in rows {
        L::table(store).insert(row).await;
    }
    count
}

fn posted(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0)
        .single()
        .unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl DemoData for Item {
    fn title(&self) -> &str {
        &self.title
    }

    fn draft_title(draft: &CreateItem) -> &str {
        &draft.title
    }

    fn demo_drafts() -> Vec<(CreateItem, DateTime<Utc>)> {
        let item = |title: &str,
                    description: &str,
                    price: f64,
                    location: &str,
                    category: &str,
                    image: &str,
                    status: ItemStatus| CreateItem {
            title: title.to_string(),
            description: description.to_string(),
            price,
            location: location.to_string(),
            category: category.to_string(),
            image_url: Some(format!("https://images.unsplash.com/{image}")),
            contact_phone: Some("555-123-4567".to_string()),
            contact_email: Some(DEMO_ADMIN_EMAIL.to_string()),
            status,
        };

        vec![
            (
                item(
                    "iPhone 13 Pro - Like New",
                    "Selling my iPhone 13 Pro, only used for 3 months. Comes with original box and accessories.",
                    899.99,
                    "New York, NY",
                    "Electronics",
                    "photo-1591337676887-a217a6970a8a",
                    ItemStatus::Active,
                ),
                posted(2023, 10, 15),
            ),
            (
                item(
                    "Leather Sofa - Excellent Condition",
                    "Beautiful brown leather sofa, 3 years old but in excellent condition. No scratches or tears.",
                    650.0,
                    "Los Angeles, CA",
                    "Furniture",
                    "photo-1540574163026-643ea20ade25",
                    ItemStatus::Active,
                ),
                posted(2023, 10, 12),
            ),
            (
                item(
                    "2018 Honda Civic - Low Mileage",
                    "2018 Honda Civic with only 25,000 miles. One owner, regular maintenance, all service records available.",
                    18500.0,
                    "Chicago, IL",
                    "Vehicles",
                    "photo-1533473359331-0135ef1b58bf",
                    ItemStatus::Sold,
                ),
                posted(2023, 10, 10),
            ),
            (
                item(
                    "Vintage Record Collection",
                    "Collection of 200+ vinyl records from the 60s and 70s, including rare first pressings.",
                    1200.0,
                    "San Francisco, CA",
                    "Collectibles",
                    "photo-1619063408105-652246c75563",
                    ItemStatus::Draft,
                ),
                posted(2023, 10, 8),
            ),
        ]
    }
}

impl DemoData for Job {
    fn title(&self) -> &str {
        &self.title
    }

    fn draft_title(draft: &CreateJob) -> &str {
        &draft.title
    }

    fn demo_drafts() -> Vec<(CreateJob, DateTime<Utc>)> {
        let job = |title: &str,
                   company: &str,
                   location: &str,
                   salary: &str,
                   description: &str,
                   requirements: &[&str],
                   job_type: &str,
                   category: &str,
                   status: JobStatus| CreateJob {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            salary: Some(salary.to_string()),
            description: description.to_string(),
            requirements: strings(requirements),
            job_type: job_type.to_string(),
            category: category.to_string(),
            status,
        };

        vec![
            (
                job(
                    "Frontend Developer",
                    "Tech Solutions Inc.",
                    "San Francisco, CA",
                    "$120,000 - $150,000",
                    "We are looking for an experienced Frontend Developer to join our team. The ideal candidate should have experience with React, TypeScript, and modern CSS frameworks.",
                    &[
                        "At least 3 years of experience with React",
                        "Strong TypeScript skills",
                        "Experience with CSS frameworks like Tailwind",
                        "Knowledge of state management solutions",
                        "Good communication skills",
                    ],
                    "Full-time",
                    "Development",
                    JobStatus::Active,
                ),
                posted(2023, 10, 20),
            ),
            (
                job(
                    "Backend Engineer",
                    "Data Systems Corp",
                    "Remote",
                    "$130,000 - $160,000",
                    "Join our backend team to build scalable and efficient APIs and services. Work with modern technologies in a collaborative environment.",
                    &[
                        "Strong Node.js experience",
                        "Knowledge of SQL and NoSQL databases",
                        "Experience with RESTful API design",
                        "Understanding of microservices architecture",
                        "Good problem-solving skills",
                    ],
                    "Full-time",
                    "Development",
                    JobStatus::Active,
                ),
                posted(2023, 10, 19),
            ),
            (
                job(
                    "UI/UX Designer",
                    "Creative Designs LLC",
                    "New York, NY",
                    "$100,000 - $120,000",
                    "We are seeking a talented UI/UX Designer to create amazing user experiences. The ideal candidate should have a portfolio of design projects and experience with design tools.",
                    &[
                        "Experience with Figma and Adobe Creative Suite",
                        "Understanding of user-centered design principles",
                        "Knowledge of responsive design",
                        "Ability to conduct user research",
                        "Good communication skills",
                    ],
                    "Full-time",
                    "Design",
                    JobStatus::Active,
                ),
                posted(2023, 10, 18),
            ),
            (
                job(
                    "DevOps Engineer",
                    "Cloud Services Inc.",
                    "Seattle, WA",
                    "$140,000 - $170,000",
                    "Join our DevOps team to build and maintain our cloud infrastructure. Experience with AWS and CI/CD pipelines is required.",
                    &[
                        "Experience with AWS services",
                        "Knowledge of Docker and Kubernetes",
                        "Experience with CI/CD tools like Jenkins or GitHub Actions",
                        "Understanding of infrastructure as code",
                        "Good problem-solving skills",
                    ],
                    "Full-time",
                    "DevOps",
                    JobStatus::Active,
                ),
                posted(2023, 10, 17),
            ),
            (
                job(
                    "Product Manager",
                    "Innovative Products Inc.",
                    "Austin, TX",
                    "$130,000 - $160,000",
                    "We are looking for a Product Manager to lead our product development process. The ideal candidate should have experience with agile methodologies and a technical background.",
                    &[
                        "Experience with agile methodologies",
                        "Technical background or understanding",
                        "Good communication skills",
                        "Ability to work with cross-functional teams",
                        "Strategic thinking",
                    ],
                    "Full-time",
                    "Management",
                    JobStatus::Closed,
                ),
                posted(2023, 10, 16),
            ),
            (
                job(
                    "Data Scientist",
                    "Analytics Corp",
                    "Boston, MA",
                    "$120,000 - $150,000",
                    "Join our data science team to analyze and interpret complex data. Experience with machine learning and statistical analysis is required.",
                    &[
                        "Strong Python skills",
                        "Experience with machine learning frameworks",
                        "Knowledge of statistical analysis",
                        "Understanding of data visualization",
                        "Good problem-solving skills",
                    ],
                    "Contract",
                    "Data Science",
                    JobStatus::Draft,
                ),
                posted(2023, 10, 15),
            ),
        ]
    }
}

impl DemoData for Campaign {
    fn title(&self) -> &str {
        &self.name
    }

    fn draft_title(draft: &CreateCampaign) -> &str {
        &draft.name
    }

    fn demo_drafts() -> Vec<(CreateCampaign, DateTime<Utc>)> {
        let campaign = |name: &str,
                        description: &str,
                        target_audience: &str,
                        platform: &str,
                        budget: f64,
                        dates: ((i32, u32, u32), (i32, u32, u32)),
                        status: CampaignStatus,
                        (leads_count, responses_count): (u32, u32),
                        message_template: Option<&str>,
                        tags: &[&str]| CreateCampaign {
            name: name.to_string(),
            description: description.to_string(),
            target_audience: target_audience.to_string(),
            platform: platform.to_string(),
            budget,
            start_date: NaiveDate::from_ymd_opt(dates.0 .0, dates.0 .1, dates.0 .2),
            end_date: NaiveDate::from_ymd_opt(dates.1 .0, dates.1 .1, dates.1 .2),
            status,
            leads_count,
            responses_count,
            message_template: message_template.map(str::to_string),
            tags: strings(tags),
        };

        vec![
            (
                campaign(
                    "LinkedIn Sales Outreach",
                    "Contacting decision makers in the tech industry for our SaaS product.",
                    "CTOs and VPs of Engineering at tech companies",
                    "LinkedIn",
                    5000.0,
                    ((2023, 10, 1), (2023, 12, 31)),
                    CampaignStatus::Active,
                    (250, 48),
                    Some("Hi {{name}}, I noticed your company is expanding its tech division. I'd love to show you how our product can help with scaling challenges."),
                    &["Tech", "SaaS", "B2B"],
                ),
                posted(2023, 9, 15),
            ),
            (
                campaign(
                    "Email Marketing Campaign",
                    "Targeted email campaign to previous customers for our new product launch.",
                    "Previous customers who purchased in the last 6 months",
                    "Email",
                    2500.0,
                    ((2023, 11, 1), (2023, 11, 30)),
                    CampaignStatus::Active,
                    (1200, 156),
                    Some("Dear {{name}}, As a valued customer, we wanted to give you early access to our newest product launch..."),
                    &["Email", "Existing Customers", "Product Launch"],
                ),
                posted(2023, 10, 20),
            ),
            (
                campaign(
                    "Twitter Ad Campaign",
                    "Targeted ads on Twitter for brand awareness in the finance sector.",
                    "Finance professionals and enthusiasts",
                    "Twitter",
                    7500.0,
                    ((2023, 8, 15), (2023, 10, 15)),
                    CampaignStatus::Completed,
                    (1850, 215),
                    None,
                    &["Social Media", "Finance", "Ads"],
                ),
                posted(2023, 8, 1),
            ),
            (
                campaign(
                    "Trade Show Contacts",
                    "Follow-up campaign for contacts collected at the industry trade show.",
                    "Trade show attendees who visited our booth",
                    "Phone",
                    3200.0,
                    ((2023, 12, 1), (2024, 1, 31)),
                    CampaignStatus::Draft,
                    (0, 0),
                    Some("Hi {{name}}, It was great meeting you at the trade show. I wanted to follow up on our conversation about..."),
                    &["Trade Show", "Follow-up", "Direct"],
                ),
                posted(2023, 11, 25),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[test]
    fn demo_drafts_pass_validation() {
        for (draft, _) in Item::demo_drafts() {
            assert!(draft.validate().is_ok(), "{draft:?}");
        }
        for (draft, _) in Job::demo_drafts() {
            assert!(draft.validate().is_ok(), "{draft:?}");
        }
        for (draft, _) in Campaign::demo_drafts() {
            assert!(draft.validate().is_ok(), "{draft:?}");
        }
    }

    #[test]
    fn demo_item_stats() {
        let stats = Item::stats(&Item::demo_rows(&demo_owner()));
        assert_eq!((stats.active, stats.sold, stats.draft), (2, 1, 1));
        assert_eq!(stats.by_category.len(), 4);
        assert_eq!(stats.total_value, 1549.99);
        assert_eq!(stats.sold_value, 18500.0);
    }

    #[test]
    fn demo_job_stats() {
        let stats = Job::stats(&Job::demo_rows(&demo_owner()));
        assert_eq!((stats.active, stats.closed, stats.draft), (4, 1, 1));
        assert_eq!(stats.by_category.get("Development"), Some(&2));
        assert_eq!(stats.by_type.get("Full-time"), Some(&5));
    }

    #[test]
    fn missing_drafts_skip_existing_titles() {
        let rows = Campaign::demo_rows(&demo_owner());
        assert!(Campaign::missing_drafts(&rows).is_empty());

        let partial = &rows[1..];
        let missing = Campaign::missing_drafts(partial);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].name, rows[0].name);

        assert_eq!(Item::missing_drafts(&[]).len(), Item::demo_drafts().len());
    }

    #[tokio::test]
    async fn seeding_twice_is_a_no_op() {
        let store = MemoryStore::default();
        seed(&store).await.unwrap();
        seed(&store).await.unwrap();

        assert_eq!(store.users.len().await, 1);
        assert_eq!(store.items.len().await, 4);
        assert_eq!(store.jobs.len().await, 6);
        assert_eq!(store.campaigns.len().await, 4);
        assert_eq!(store.items.by_owner(DEMO_ADMIN_ID).await.len(), 4);
    }
}
