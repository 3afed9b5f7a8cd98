pub mod infection_graph;
