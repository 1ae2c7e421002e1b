// Karmada multi-cluster networking.

use super::DataSource;
use crate::schema::*;
use crate::types::CrdIdentity;

const GROUP: &str = "networking.karmada.io";
const VERSION: &str = "v1alpha1";

pub fn data_sources() -> Vec<DataSource> {
    vec![multi_cluster_ingress(), multi_cluster_service()]
}

fn ingress_backend(name: &'static str) -> Field {
    object(
        name,
        vec![
            object(
                "resource",
                vec![string("apiGroup"), string("kind").required(), string("name").required()],
            ),
            object(
                "service",
                vec![
                    string("name").required(),
                    object(
                        "port",
                        vec![string("name"), bounded("number", Some(1), Some(65535))],
                    ),
                ],
            ),
        ],
    )
}

fn multi_cluster_ingress() -> DataSource {
    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "MultiClusterIngress"),
        description: "MultiClusterIngress is a collection of rules that allow inbound connections to reach the endpoints defined by a backend.",
        emits_id: false,
        spec: vec![
            ingress_backend("defaultBackend")
                .doc("DefaultBackend is the backend that should handle requests that don't match any rule."),
            string("ingressClassName"),
            object_list(
                "rules",
                vec![
                    string("host"),
                    object(
                        "http",
                        vec![object_list(
                            "paths",
                            vec![
                                ingress_backend("backend").required(),
                                string("path"),
                                enumeration("pathType", &["Exact", "Prefix", "ImplementationSpecific"]).required(),
                            ],
                        )
                        .required()],
                    ),
                ],
            )
            .doc("A list of host rules used to configure the Ingress."),
            object_list("tls", vec![string_list("hosts"), string("secretName")]),
        ],
    }
}

fn multi_cluster_service() -> DataSource {
    let cluster_selector = |name: &'static str| object_list(name, vec![string("name").required()]);

    DataSource {
        identity: CrdIdentity::new(GROUP, VERSION, "MultiClusterService"),
        description: "MultiClusterService is a named abstraction of multi-cluster software service.",
        emits_id: false,
        spec: vec![
            object_list(
                "ports",
                vec![string("name"), bounded("port", Some(1), Some(65535)).required()],
            )
            .doc("Ports is the list of ports that are exposed by this MultiClusterService."),
            object("range", vec![string_list("clusterNames")]),
            string_list("serviceConsumptionClusters"),
            string_list("serviceProvisionClusters"),
            cluster_selector("consumerClusters"),
            cluster_selector("providerClusters"),
            Field::new(
                "types",
                FieldType::List(Box::new(FieldType::String {
                    allowed: &["LoadBalancer", "CrossCluster"],
                })),
            )
            .required()
            .doc("Types specifies how to expose the service referencing by this MultiClusterService."),
        ],
    }
}
