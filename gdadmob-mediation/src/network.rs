//! Mediation network entries derived from namespaced properties.

use gdadmob_props::{list_literal, split_list, PropertySet};
use gdadmob_template::TokenMap;

/// The fixed per-network fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkField {
    Dependencies,
    MavenRepo,
    AndroidAdapterClass,
    IosAdapterClass,
    Pod,
    PodVersion,
    SkAdNetworkIds,
}

impl NetworkField {
    pub const ALL: [NetworkField; 7] = [
        NetworkField::Dependencies,
        NetworkField::MavenRepo,
        NetworkField::AndroidAdapterClass,
        NetworkField::IosAdapterClass,
        NetworkField::Pod,
        NetworkField::PodVersion,
        NetworkField::SkAdNetworkIds,
    ];

    /// Key suffix in `mediation.properties` (`<network>.<key>`).
    pub fn property_key(self) -> &'static str {
        match self {
            NetworkField::Dependencies => "dependencies",
            NetworkField::MavenRepo => "mavenRepo",
            NetworkField::AndroidAdapterClass => "androidAdapterClass",
            NetworkField::IosAdapterClass => "iosAdapterClass",
            NetworkField::Pod => "pod",
            NetworkField::PodVersion => "podVersion",
            NetworkField::SkAdNetworkIds => "skAdNetworkIds",
        }
    }

    /// Token name suffix (`@<network><suffix>@`).
    pub fn token_suffix(self) -> &'static str {
        match self {
            NetworkField::Dependencies => "Dependencies",
            NetworkField::MavenRepo => "MavenRepo",
            NetworkField::AndroidAdapterClass => "AndroidAdapterClass",
            NetworkField::IosAdapterClass => "IosAdapterClass",
            NetworkField::Pod => "Pod",
            NetworkField::PodVersion => "PodVersion",
            NetworkField::SkAdNetworkIds => "SkAdNetworkIds",
        }
    }

    /// List fields are rendered as quoted list literals.
    pub fn is_list(self) -> bool {
        matches!(self, NetworkField::Dependencies | NetworkField::SkAdNetworkIds)
    }
}

/// One mediation partner's adapter metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediationNetworkEntry {
    pub name: String,
    pub dependencies: Vec<String>,
    pub maven_repo: String,
    pub android_adapter_class: String,
    pub ios_adapter_class: String,
    pub pod: String,
    pub pod_version: String,
    pub sk_ad_network_ids: Vec<String>,
}

impl MediationNetworkEntry {
    /// One entry per distinct key prefix, sorted by network name.
    pub fn collect(props: &PropertySet) -> Vec<Self> {
        props
            .namespaces()
            .into_iter()
            .map(|name| Self::from_properties(name, props))
            .collect()
    }

    /// Reads the fields of `name`; absent fields are empty.
    pub fn from_properties(name: &str, props: &PropertySet) -> Self {
        let key = |field: NetworkField| format!("{name}.{}", field.property_key());
        let scalar = |field| props.get(&key(field)).unwrap_or_default().to_string();
        let list = |field| props.get_list(&key(field));

        Self {
            name: name.to_string(),
            dependencies: list(NetworkField::Dependencies),
            maven_repo: scalar(NetworkField::MavenRepo),
            android_adapter_class: scalar(NetworkField::AndroidAdapterClass),
            ios_adapter_class: scalar(NetworkField::IosAdapterClass),
            pod: scalar(NetworkField::Pod),
            pod_version: scalar(NetworkField::PodVersion),
            sk_ad_network_ids: list(NetworkField::SkAdNetworkIds),
        }
    }

    /// Substitution text for a field.
    pub fn value(&self, field: NetworkField) -> String {
        match field {
            NetworkField::Dependencies => list_literal(&self.dependencies),
            NetworkField::MavenRepo => self.maven_repo.clone(),
            NetworkField::AndroidAdapterClass => self.android_adapter_class.clone(),
            NetworkField::IosAdapterClass => self.ios_adapter_class.clone(),
            NetworkField::Pod => self.pod.clone(),
            NetworkField::PodVersion => self.pod_version.clone(),
            NetworkField::SkAdNetworkIds => list_literal(&self.sk_ad_network_ids),
        }
    }

    pub fn token_name(&self, field: NetworkField) -> String {
        format!("{}{}", self.name, field.token_suffix())
    }

    /// The seven tokens of this network.
    pub fn tokens(&self) -> TokenMap {
        NetworkField::ALL
            .into_iter()
            .map(|field| (self.token_name(field), self.value(field)))
            .collect()
    }
}
