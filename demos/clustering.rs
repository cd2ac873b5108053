//! K-means and x-means on a simple 2D dataset.

use xmeans::{
    Clustering, EllipseCentroids, Kmeans, Manhattan, RandomCentroids, SquaredEuclidean, XMeans,
};

fn main() {
    // Three well-separated clusters in 2D.
    let data: Vec<Vec<f64>> = vec![
        // Cluster A (near origin)
        vec![0.0, 0.0],
        vec![0.1, 0.2],
        vec![0.2, 0.1],
        vec![-0.1, 0.1],
        // Cluster B (near (5, 5))
        vec![5.0, 5.0],
        vec![5.1, 4.9],
        vec![4.9, 5.1],
        vec![5.2, 5.2],
        // Cluster C (near (10, 0))
        vec![10.0, 0.0],
        vec![10.1, 0.1],
        vec![9.9, -0.1],
        vec![10.2, 0.2],
    ];

    // --- K-means (k=3) ---
    let kmeans = Kmeans::new(3).with_seed(42);
    let labels = kmeans.fit_predict(&data).unwrap();
    println!("=== K-means (k=3) ===");
    for (i, label) in labels.iter().enumerate() {
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => cluster {}",
            i, data[i][0], data[i][1], label
        );
    }

    // --- K-means with Manhattan distance and ellipse seeding ---
    let fit = Kmeans::new(3)
        .with_seed(42)
        .fit(&data, &EllipseCentroids::default(), &Manhattan)
        .unwrap();
    println!("\n=== K-means (k=3, Manhattan, ellipse seeding) ===");
    for (c, centroid) in fit.centroids.iter().enumerate() {
        println!(
            "  centroid {} at ({:5.2}, {:5.2})",
            c, centroid[0], centroid[1]
        );
    }

    // --- X-means (k discovered by BIC) ---
    let model = XMeans::new()
        .with_seed(42)
        .fit(&data, &RandomCentroids, &SquaredEuclidean)
        .unwrap();
    println!("\n=== X-means ===");
    println!("  discovered {} clusters", model.len());
    let labels = model.labels().unwrap();
    for (i, label) in labels.iter().enumerate() {
        println!(
            "  point {:2} ({:5.1}, {:5.1}) => cluster {}",
            i, data[i][0], data[i][1], label
        );
    }
}
