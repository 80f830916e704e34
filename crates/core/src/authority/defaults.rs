//! Built-in authority table for Olongapo City, Zambales.

use super::{AuthoritiesByCategory, Authority};

/// `(category, [(id, name, department)])`, in display order.
static DEFAULT_TABLE: &[(&str, &[(&str, &str, &str)])] = &[
    (
        "infrastructure",
        &[
            ("infra-ceo", "City Engineering Office (CEO)", "Public Works & Infrastructure"),
            ("infra-ocbo", "Office of the City Building Official (OCBO)", "Building Permits & Structural Safety"),
            ("infra-cpdo", "City Planning & Development Office (CPDO)", "Planning, Zoning & Urban Development"),
            ("infra-dpwh-zam2", "DPWH Zambales 2nd District Engineering Office", "National Roads & Bridges within Olongapo"),
        ],
    ),
    (
        "utilities",
        &[
            ("util-subicwater", "Subic Water and Sewerage Company, Inc. (SUBICWATER)", "Water & Sewerage Utility"),
            ("util-oedc", "Olongapo Electricity Distribution Company (OEDC)", "Electric Distribution Utility"),
            ("util-pldt", "PLDT Olongapo", "Telecommunications / Landline / Fiber"),
            ("util-globe", "Globe Telecom – Olongapo", "Telecommunications / Mobile / Broadband"),
            ("util-converge", "Converge ICT – Olongapo", "Telecommunications / Fiber"),
        ],
    ),
    (
        "sanitation and waste",
        &[
            ("san-esmo", "Environmental Sanitation & Management Office (ESMO)", "Solid Waste Management Division"),
            ("san-cenro", "City Environment & Natural Resources Office (CENRO)", "Environmental Management & Sanitation"),
        ],
    ),
    (
        "environment and public spaces",
        &[
            ("env-ppmo", "Parks & Plaza Management Office (PPMO)", "City Parks, Plazas & Beautification"),
            ("env-cenro", "City Environment & Natural Resources Office (CENRO)", "Urban Forestry, Environment & Compliance"),
        ],
    ),
    (
        "community and safety",
        &[
            ("safe-ocpo", "Olongapo City Police Office (OCPO)", "Law Enforcement"),
            ("safe-bfp", "Bureau of Fire Protection – Olongapo City", "Fire Safety & Emergency Response"),
            ("safe-cdrrmo", "City Disaster Risk Reduction & Management Office (CDRRMO)", "Disaster Preparedness & Response"),
            ("safe-otmps", "Office of Traffic Management & Public Safety (OTMPS)", "Traffic & Road Safety"),
            ("safe-brgy", "Barangay Office – [specify barangay]", "Local Barangay Government Unit"),
        ],
    ),
    (
        "government / administrative",
        &[
            ("gov-admin", "Office of the City Administrator", "City Government Administration"),
            ("gov-mayor", "Office of the Mayor", "Executive Leadership"),
            ("gov-legal", "City Legal Office", "Legal Affairs & Compliance"),
            ("gov-council", "Sangguniang Panlungsod (City Council) Secretariat", "Legislative Support"),
        ],
    ),
    (
        "others",
        &[
            ("other-sbma", "Subic Bay Metropolitan Authority (SBMA)", "Freeport Zone Jurisdiction"),
            ("other-dswd", "DSWD – Olongapo City Field Office", "Social Welfare & Community Support"),
            ("other-deped", "DepEd – Olongapo City Schools Division Office", "Public Schools & Facilities"),
        ],
    ),
    // Fallback when the category is missing or unknown.
    (
        "default",
        &[("default-mayor", "Office of the Mayor", "General Fallback")],
    ),
];

/// A fresh copy of the built-in table. Mutating the result never affects
/// later calls.
pub fn default_authorities() -> AuthoritiesByCategory {
    DEFAULT_TABLE
        .iter()
        .map(|(category, entries)| {
            let list = entries
                .iter()
                .map(|(id, name, department)| Authority::new(id, name, department))
                .collect();
            (category.to_string(), list)
        })
        .collect()
}
