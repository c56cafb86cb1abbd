use serde::{Deserialize, Serialize};

/// The fixed column schema of a listing scrape export, in export order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    DateGmt,
    JobLink,
    OriginUrl,
    ListingsLimit,
    Position,
    OpenHomeStatus,
    AgentName,
    AgencyName,
    ListingDate,
    PropertyTitle,
    PropertyAddress,
    Bedrooms,
    Bathrooms,
    Area,
    Price,
    PropertyLink,
}

impl Column {
    pub const ALL: [Column; 16] = [
        Column::DateGmt,
        Column::JobLink,
        Column::OriginUrl,
        Column::ListingsLimit,
        Column::Position,
        Column::OpenHomeStatus,
        Column::AgentName,
        Column::AgencyName,
        Column::ListingDate,
        Column::PropertyTitle,
        Column::PropertyAddress,
        Column::Bedrooms,
        Column::Bathrooms,
        Column::Area,
        Column::Price,
        Column::PropertyLink,
    ];

    /// Header text exactly as it appears in the export
    pub fn header(self) -> &'static str {
        match self {
            Column::DateGmt => "Date (GMT)",
            Column::JobLink => "Job Link",
            Column::OriginUrl => "Origin URL",
            Column::ListingsLimit => "Auckland Property Listings Limit",
            Column::Position => "Position",
            Column::OpenHomeStatus => "Open Home Status",
            Column::AgentName => "Agent Name",
            Column::AgencyName => "Agency Name",
            Column::ListingDate => "Listing Date",
            Column::PropertyTitle => "Property Title",
            Column::PropertyAddress => "Property Address",
            Column::Bedrooms => "Bedrooms",
            Column::Bathrooms => "Bathrooms",
            Column::Area => "Area",
            Column::Price => "Price",
            Column::PropertyLink => "Property Link",
        }
    }

    /// Case-sensitive lookup of an already-trimmed header
    pub fn from_header(header: &str) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.header() == header)
    }
}

/// A listing row normalized to the fixed schema.
///
/// Every column is always present; missing cells hold an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(rename = "Date (GMT)", default)]
    pub date_gmt: String,
    #[serde(rename = "Job Link", default)]
    pub job_link: String,
    #[serde(rename = "Origin URL", default)]
    pub origin_url: String,
    #[serde(rename = "Auckland Property Listings Limit", default)]
    pub listings_limit: String,
    #[serde(rename = "Position", default)]
    pub position: String,
    #[serde(rename = "Open Home Status", default)]
    pub open_home_status: String,
    #[serde(rename = "Agent Name", default)]
    pub agent_name: String,
    #[serde(rename = "Agency Name", default)]
    pub agency_name: String,
    #[serde(rename = "Listing Date", default)]
    pub listing_date: String,
    #[serde(rename = "Property Title", default)]
    pub property_title: String,
    #[serde(rename = "Property Address", default)]
    pub property_address: String,
    #[serde(rename = "Bedrooms", default)]
    pub bedrooms: String,
    #[serde(rename = "Bathrooms", default)]
    pub bathrooms: String,
    #[serde(rename = "Area", default)]
    pub area: String,
    #[serde(rename = "Price", default)]
    pub price: String,
    #[serde(rename = "Property Link", default)]
    pub property_link: String,
}

impl PropertyRecord {
    pub fn get(&self, column: Column) -> &str {
        match column {
            Column::DateGmt => &self.date_gmt,
            Column::JobLink => &self.job_link,
            Column::OriginUrl => &self.origin_url,
            Column::ListingsLimit => &self.listings_limit,
            Column::Position => &self.position,
            Column::OpenHomeStatus => &self.open_home_status,
            Column::AgentName => &self.agent_name,
            Column::AgencyName => &self.agency_name,
            Column::ListingDate => &self.listing_date,
            Column::PropertyTitle => &self.property_title,
            Column::PropertyAddress => &self.property_address,
            Column::Bedrooms => &self.bedrooms,
            Column::Bathrooms => &self.bathrooms,
            Column::Area => &self.area,
            Column::Price => &self.price,
            Column::PropertyLink => &self.property_link,
        }
    }

    pub fn set(&mut self, column: Column, value: String) {
        let slot = match column {
            Column::DateGmt => &mut self.date_gmt,
            Column::JobLink => &mut self.job_link,
            Column::OriginUrl => &mut self.origin_url,
            Column::ListingsLimit => &mut self.listings_limit,
            Column::Position => &mut self.position,
            Column::OpenHomeStatus => &mut self.open_home_status,
            Column::AgentName => &mut self.agent_name,
            Column::AgencyName => &mut self.agency_name,
            Column::ListingDate => &mut self.listing_date,
            Column::PropertyTitle => &mut self.property_title,
            Column::PropertyAddress => &mut self.property_address,
            Column::Bedrooms => &mut self.bedrooms,
            Column::Bathrooms => &mut self.bathrooms,
            Column::Area => &mut self.area,
            Column::Price => &mut self.price,
            Column::PropertyLink => &mut self.property_link,
        };
        *slot = value;
    }

    /// Builder-style setter, mostly handy in tests and fixtures
    pub fn with(mut self, column: Column, value: impl Into<String>) -> Self {
        self.set(column, value.into());
        self
    }
}
