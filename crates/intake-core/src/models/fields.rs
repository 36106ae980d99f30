//! Column names of the onboarding table in the tabular store.
//!
//! The store schema is in French; these names must match it exactly.

pub const COMPANY_NAME: &str = "Nom de l'entreprise";
pub const MAIN_CONTACT: &str = "Contact principal";
pub const EMAIL: &str = "Email";
pub const PHONE: &str = "Téléphone";
pub const TAGLINE: &str = "Slogan/Tagline";
pub const LOGO: &str = "Logo";
pub const PRINCIPAL_COLOR: &str = "Couleur principale";
pub const SECONDARY_COLOR: &str = "Couleur secondaire";
pub const COMPLEMENTARY_COLORS: &str = "Couleurs complémentaires";
pub const TYPOGRAPHY: &str = "Typographies souhaitées";
pub const VISUAL_STYLE: &str = "Style visuel préféré";
pub const COMPANY_DESCRIPTION: &str = "Description entreprise";
pub const SERVICES: &str = "Services/Produits";
pub const VALUES: &str = "Valeurs entreprise";
pub const TESTIMONIALS: &str = "Témoignages clients";
pub const FAQ: &str = "FAQ";
pub const TEAM_PHOTOS: &str = "Photos équipe";
pub const PRODUCT_PHOTOS: &str = "Photos produits/services";
pub const PREMISES_PHOTOS: &str = "Photos locaux/ambiance";
pub const VIDEO_LINKS: &str = "Vidéos";
pub const ADDRESS: &str = "Adresse complète";
pub const OPENING_HOURS: &str = "Horaires d'ouverture";
pub const SOCIAL_NETWORKS: &str = "Réseaux sociaux";
pub const DOMAIN_NAME: &str = "Nom de domaine souhaité";
pub const EXISTING_ACCESS: &str = "Accès existants";
pub const REFERENCE_SITES: &str = "Sites références";
pub const LEGAL_NOTICE: &str = "Mentions légales";
pub const TERMS: &str = "CGV/CGU";
pub const COMMERCIAL_DOCUMENTS: &str = "Documents commerciaux";

// Server-owned columns
pub const SUBMITTED_AT: &str = "Date soumission";
pub const ONBOARDING_STATUS: &str = "Statut onboarding";
pub const LAST_UPDATED: &str = "Dernière mise à jour";

/// Status given to a record on creation.
pub const INITIAL_STATUS: &str = "En cours";

/// Text fields the form lets the client fill in, in display order.
pub const FILLABLE_TEXT_FIELDS: &[&str] = &[
    COMPANY_NAME,
    MAIN_CONTACT,
    EMAIL,
    PHONE,
    TAGLINE,
    PRINCIPAL_COLOR,
    SECONDARY_COLOR,
    COMPLEMENTARY_COLORS,
    TYPOGRAPHY,
    VISUAL_STYLE,
    COMPANY_DESCRIPTION,
    SERVICES,
    VALUES,
    TESTIMONIALS,
    FAQ,
    VIDEO_LINKS,
    ADDRESS,
    OPENING_HOURS,
    SOCIAL_NETWORKS,
    DOMAIN_NAME,
    EXISTING_ACCESS,
    REFERENCE_SITES,
    LEGAL_NOTICE,
];
